//! Derives the type definitions a client needs to send GraphQL operations and decode their
//! responses, from a schema and a set of operation documents.
//!
//! The output is an intermediate representation (`Generated`) for a renderer to turn into
//! source code: one struct per selection set, enums, input objects, and interfaces standing
//! for abstract types. The shape of every type follows the selection, not the schema type, so
//! the same schema type selected differently in two places gives two types.

extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate graphql_parser;
extern crate heck;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
#[cfg(test)]
extern crate serde_json;

mod config;
mod convert;
mod errors;
mod naming;
mod options;
mod registry;
mod resolve;
mod schema;
mod selection;
mod shared;
mod types;

pub use config::{builtin_type, Config, BUILTIN_TYPES};
pub use convert::Generator;
pub use errors::{ErrorKind, GenerateError, Location, Position};
pub use naming::type_name;
pub use options::{DirectiveOptions, DIRECTIVE_NAME};
pub use registry::TypeRegistry;
pub use resolve::{parse_operations, resolve_operations, ResolutionContext};
pub use schema::{FieldDefinition, SchemaModel, TypeKind};
pub use selection::{Operation, OperationKind, SelectedField, Selection, Variable};
pub use types::{Argument, EnumType, EnumValue, InterfaceType, OperationTypes, StructField,
                StructType, TypeDef, TypeNode};

use graphql_parser::query;

/// The types of one generation run.
#[derive(Debug, Serialize)]
pub struct Generated {
    pub types: TypeRegistry,
    pub operations: Vec<OperationTypes>,
}

/// Generates the types for every operation in `document`.
///
/// The run stops at the first error. Operations are converted in document order, which
/// decides the name an enum or input type gets when several operations use it.
pub fn generate(
    schema: &SchemaModel,
    document: &query::Document,
    config: &Config,
) -> Result<Generated, GenerateError> {
    let operations = resolve_operations(schema, document)?;
    let mut generator = Generator::new(schema, config);

    let mut converted = Vec::with_capacity(operations.len());
    for operation in operations.iter() {
        converted.push(generator.convert_operation(operation)?);
    }

    info!(
        "generated {} types for {} operations",
        generator.registry().len(),
        converted.len()
    );

    Ok(Generated {
        types: generator.into_registry(),
        operations: converted,
    })
}

/// Parses both documents, then generates.
pub fn generate_from_str(
    schema: &str,
    operations: &str,
    config: &Config,
) -> Result<Generated, GenerateError> {
    let schema = SchemaModel::parse(schema)?;
    let document = parse_operations(operations)?;
    generate(&schema, &document, config)
}
