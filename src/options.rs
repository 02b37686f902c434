use errors::{GenerateError, Location};
use graphql_parser::query::{Directive, Value};

/// Name of the directive that configures generation for an operation or a field.
pub const DIRECTIVE_NAME: &str = "typegen";

/// Resolved per-selection options. `None` means "inherit from the enclosing scope".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    /// Wrap the generated type in an optional wrapper.
    pub pointer: Option<bool>,
}

impl DirectiveOptions {
    pub fn pointer() -> DirectiveOptions {
        DirectiveOptions {
            pointer: Some(true),
        }
    }

    pub fn get_pointer(&self) -> bool {
        self.pointer.unwrap_or(false)
    }

    /// Options of `child` win over `self`, independently for every option.
    pub fn merge(&self, child: &DirectiveOptions) -> DirectiveOptions {
        DirectiveOptions {
            pointer: child.pointer.or(self.pointer),
        }
    }

    /// Reads every `@typegen(...)` directive; later directives override earlier ones.
    pub fn from_directives(directives: &[Directive]) -> Result<DirectiveOptions, GenerateError> {
        let mut options = DirectiveOptions::default();

        for directive in directives.iter().filter(|d| d.name == DIRECTIVE_NAME) {
            let mut parsed = DirectiveOptions::default();
            for (name, value) in directive.arguments.iter() {
                match (name.as_str(), value) {
                    ("pointer", Value::Boolean(flag)) => parsed.pointer = Some(*flag),
                    ("pointer", other) => {
                        return Err(GenerateError::InvalidOption {
                            location: Location::at(directive.position),
                            message: format!("pointer must be a boolean, got {:?}", other),
                        })
                    }
                    (unknown, _) => {
                        return Err(GenerateError::InvalidOption {
                            location: Location::at(directive.position),
                            message: format!("unknown option {}", unknown),
                        })
                    }
                }
            }
            options = options.merge(&parsed);
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::ErrorKind;
    use graphql_parser::parse_query;
    use graphql_parser::query::{Definition, OperationDefinition};

    fn operation_directives(query: &str) -> Vec<Directive> {
        let document = parse_query(query).unwrap();
        match &document.definitions[0] {
            Definition::Operation(OperationDefinition::Query(q)) => q.directives.clone(),
            other => panic!("unexpected definition {:?}", other),
        }
    }

    #[test]
    fn child_overrides_parent_unless_unset() {
        let parent = DirectiveOptions::pointer();
        let unset = DirectiveOptions::default();
        let off = DirectiveOptions {
            pointer: Some(false),
        };

        assert_eq!(parent.merge(&unset), parent);
        assert_eq!(parent.merge(&off), off);
        assert_eq!(unset.merge(&parent), parent);
    }

    #[test]
    fn parses_pointer_option() {
        let directives = operation_directives("query Q @typegen(pointer: true) { a }");
        assert_eq!(
            DirectiveOptions::from_directives(&directives),
            Ok(DirectiveOptions::pointer())
        );
    }

    #[test]
    fn other_directives_are_ignored() {
        let directives = operation_directives("query Q @cached(ttl: 10) { a }");
        assert_eq!(
            DirectiveOptions::from_directives(&directives),
            Ok(DirectiveOptions::default())
        );
    }

    #[test]
    fn rejects_unknown_options() {
        let directives = operation_directives("query Q @typegen(omitempty: true) { a }");
        let err = DirectiveOptions::from_directives(&directives).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn rejects_non_boolean_pointer() {
        let directives = operation_directives("query Q @typegen(pointer: \"yes\") { a }");
        let err = DirectiveOptions::from_directives(&directives).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }
}
