extern crate env_logger;
extern crate failure;
extern crate gql_typegen;
extern crate graphql_parser;
#[macro_use]
extern crate log;
extern crate serde_json;
extern crate serde_yaml;
extern crate structopt;

use failure::ResultExt;
use gql_typegen::{generate, parse_operations, Config, SchemaModel};
use graphql_parser::query::Document;
use std::fs;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "typegen", about = "Client type generation for GraphQL operations")]
enum Command {
    /// Print the types generated for a set of operations, as JSON
    #[structopt(name = "generate")]
    Generate {
        /// The path to the GraphQL schema
        #[structopt(parse(from_os_str))]
        schema: PathBuf,
        /// Operation documents. Fragments may be shared between them.
        #[structopt(parse(from_os_str), required = true)]
        operations: Vec<PathBuf>,
        /// YAML file with scalar bindings and feature flags
        #[structopt(short = "c", long = "config", parse(from_os_str))]
        config: Option<PathBuf>,
    },
}

fn read(path: &Path) -> Result<String, failure::Error> {
    let contents = fs::read_to_string(path)
        .with_context(|_| format!("could not read {}", path.display()))?;
    Ok(contents)
}

fn load_config(path: Option<&Path>) -> Result<Config, failure::Error> {
    match path {
        Some(path) => {
            let config = serde_yaml::from_str(&read(path)?)
                .with_context(|_| format!("invalid config in {}", path.display()))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn run() -> Result<(), failure::Error> {
    match Command::from_args() {
        Command::Generate {
            schema,
            operations,
            config,
        } => {
            let config = load_config(config.as_ref().map(PathBuf::as_path))?;
            let schema = SchemaModel::parse(&read(&schema)?)?;

            let mut document = Document {
                definitions: Vec::new(),
            };
            for path in operations.iter() {
                debug!("reading operations from {}", path.display());
                let parsed = parse_operations(&read(path)?)
                    .with_context(|_| format!("in {}", path.display()))?;
                document.definitions.extend(parsed.definitions);
            }

            let generated = generate(&schema, &document, &config)?;
            println!("{}", serde_json::to_string_pretty(&generated)?);
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        for cause in err.iter_chain() {
            eprintln!("error: {}", cause);
        }
        ::std::process::exit(1);
    }
}
