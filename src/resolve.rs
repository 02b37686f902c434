//! Binds the operations of a query document to the schema and flattens their fragments.
//!
//! The type conversion only ever sees plain fields: named fragments and inline fragments are
//! expanded here, and fields reached through a fragment that does not apply to every
//! possible type of the enclosing selection are tagged with its type condition, along with
//! the conditions of the fragments enclosing it.

use errors::{GenerateError, Location};
use graphql_parser;
use graphql_parser::query::{self, Definition, Document, FragmentDefinition, OperationDefinition,
                            SelectionSet, TypeCondition, VariableDefinition};
use options::DirectiveOptions;
use schema::{self, SchemaModel};
use selection::{merge_field, Operation, OperationKind, SelectedField, Selection, Variable};
use shared::extract_inner_name;
use std::collections::HashMap;

pub struct ResolutionContext<'a> {
    schema: &'a SchemaModel,
    fragment_definitions: HashMap<&'a str, &'a FragmentDefinition>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(schema: &'a SchemaModel, document: &'a Document) -> ResolutionContext<'a> {
        let fragment_definitions = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
                _ => None,
            })
            .collect();

        ResolutionContext {
            schema,
            fragment_definitions,
        }
    }

    pub fn resolve_operation(
        &self,
        operation: &'a OperationDefinition,
    ) -> Result<Operation, GenerateError> {
        let (kind, position, name, variable_definitions, directives, selection_set) =
            match operation {
                OperationDefinition::Query(q) => (
                    OperationKind::Query,
                    q.position,
                    &q.name,
                    &q.variable_definitions,
                    &q.directives,
                    &q.selection_set,
                ),
                OperationDefinition::Mutation(m) => (
                    OperationKind::Mutation,
                    m.position,
                    &m.name,
                    &m.variable_definitions,
                    &m.directives,
                    &m.selection_set,
                ),
                OperationDefinition::Subscription(s) => (
                    OperationKind::Subscription,
                    s.position,
                    &s.name,
                    &s.variable_definitions,
                    &s.directives,
                    &s.selection_set,
                ),
                OperationDefinition::SelectionSet(set) => {
                    return Err(GenerateError::not_supported(
                        Location::at(set.span.0),
                        "anonymous operation",
                    ))
                }
            };

        let name = name.as_ref().ok_or_else(|| {
            GenerateError::not_supported(Location::at(position), "anonymous operation")
        })?;

        // Subscriptions without a root type are reported by the generator, with the rest.
        let mut resolved = Vec::new();
        if let Some(root) = self.schema.root_type(kind) {
            self.resolve_selection_set(
                schema::type_name(root),
                selection_set,
                &[],
                &mut Vec::new(),
                &mut resolved,
            )?;
        }

        Ok(Operation {
            kind,
            name: name.clone(),
            position: position.into(),
            options: DirectiveOptions::from_directives(directives)?,
            variables: variable_definitions.iter().map(resolve_variable).collect(),
            selection_set: resolved,
        })
    }

    /// Appends the fields of `selection_set`, selected on `parent`, to `out`.
    fn resolve_selection_set(
        &self,
        parent: &str,
        selection_set: &'a SelectionSet,
        conditions: &[&'a str],
        visiting: &mut Vec<&'a str>,
        out: &mut Vec<Selection>,
    ) -> Result<(), GenerateError> {
        for item in selection_set.items.iter() {
            match item {
                query::Selection::Field(field) => {
                    let definition = self.schema.field(parent, &field.name);

                    let mut children = Vec::new();
                    if let Some(ref definition) = definition {
                        self.resolve_selection_set(
                            extract_inner_name(&definition.field_type),
                            &field.selection_set,
                            &[],
                            visiting,
                            &mut children,
                        )?;
                    }

                    let resolved = SelectedField {
                        alias: field.alias.as_ref().unwrap_or(&field.name).clone(),
                        name: field.name.clone(),
                        position: field.position.into(),
                        definition,
                        options: DirectiveOptions::from_directives(&field.directives)?,
                        type_conditions: conditions.iter().map(|c| c.to_string()).collect(),
                        selection_set: children,
                    };
                    let position = resolved.position;
                    merge_field(out, resolved).map_err(|alias| {
                        GenerateError::internal(
                            position,
                            format!("conflicting selections for {}", alias),
                        )
                    })?;
                }
                query::Selection::FragmentSpread(spread) => {
                    let fragment: &'a FragmentDefinition = self.fragment_definitions
                        .get(spread.fragment_name.as_str())
                        .cloned()
                        .ok_or_else(|| {
                            GenerateError::internal(
                                Location::at(spread.position),
                                format!("unknown fragment {}", spread.fragment_name),
                            )
                        })?;

                    if visiting.contains(&fragment.name.as_str()) {
                        return Err(GenerateError::internal(
                            Location::at(spread.position),
                            format!("fragment {} spreads itself", fragment.name),
                        ));
                    }

                    let TypeCondition::On(ref on) = fragment.type_condition;
                    visiting.push(&fragment.name);
                    self.resolve_selection_set(
                        on,
                        &fragment.selection_set,
                        &self.narrow(parent, on, conditions),
                        visiting,
                        out,
                    )?;
                    visiting.pop();
                }
                query::Selection::InlineFragment(inline) => match inline.type_condition {
                    Some(TypeCondition::On(ref on)) => self.resolve_selection_set(
                        on,
                        &inline.selection_set,
                        &self.narrow(parent, on, conditions),
                        visiting,
                        out,
                    )?,
                    None => self.resolve_selection_set(
                        parent,
                        &inline.selection_set,
                        conditions,
                        visiting,
                        out,
                    )?,
                },
            }
        }

        Ok(())
    }

    /// The type conditions of fields selected through a fragment on `on`, itself selected on
    /// `parent` under `conditions`.
    fn narrow(&self, parent: &str, on: &'a str, conditions: &[&'a str]) -> Vec<&'a str> {
        let mut narrowed = conditions.to_vec();
        if on == parent || narrowed.contains(&on) {
            return narrowed;
        }
        // A fragment on an interface or union that `parent` belongs to always applies.
        if !self.schema.is_abstract(parent) && self.schema.applies_to(on, parent) {
            return narrowed;
        }
        narrowed.push(on);
        narrowed
    }
}

fn resolve_variable(variable: &VariableDefinition) -> Variable {
    Variable {
        name: variable.name.clone(),
        var_type: variable.var_type.clone(),
        position: variable.position.into(),
    }
}

/// Resolves every operation of a query document, in document order.
pub fn resolve_operations(
    schema: &SchemaModel,
    document: &Document,
) -> Result<Vec<Operation>, GenerateError> {
    let context = ResolutionContext::new(schema, document);

    document
        .definitions
        .iter()
        .filter_map(|def| match def {
            Definition::Operation(operation) => Some(context.resolve_operation(operation)),
            Definition::Fragment(_) => None,
        })
        .collect()
}

pub fn parse_operations(source: &str) -> Result<Document, GenerateError> {
    graphql_parser::parse_query(source).map_err(|err| GenerateError::Parse {
        document: "operations",
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::ErrorKind;

    const SCHEMA: &str = r##"
    interface Content {
        id: ID!
        title: String
    }

    type Article implements Content {
        id: ID!
        title: String
        text: String!
    }

    type Video implements Content {
        id: ID!
        title: String
        duration: Int
    }

    type User {
        id: ID!
        name: String
        favorite: Content
    }

    type Query {
        me: User
        content(id: ID!): Content
    }
    "##;

    macro_rules! resolve {
        ($query:expr) => {{
            let schema = SchemaModel::parse(SCHEMA).unwrap();
            let document = parse_operations($query).unwrap();
            resolve_operations(&schema, &document)
        }};
    }

    fn shape(selection_set: &[Selection]) -> Vec<String> {
        selection_set
            .iter()
            .map(|selection| match selection {
                Selection::Field(field) => {
                    let condition = if field.type_conditions.is_empty() {
                        String::new()
                    } else {
                        format!(" on {}", field.type_conditions.join(" & "))
                    };
                    if field.selection_set.is_empty() {
                        format!("{}{}", field.alias, condition)
                    } else {
                        format!(
                            "{}{} {{ {} }}",
                            field.alias,
                            condition,
                            shape(&field.selection_set).join(" ")
                        )
                    }
                }
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[test]
    fn binds_fields_and_variables() {
        let operations = resolve!(
            r##"
            query GetContent($id: ID!) @typegen(pointer: true) {
                content(id: $id) { id }
            }
            "##
        ).unwrap();

        assert_eq!(operations.len(), 1);
        let operation = &operations[0];
        assert_eq!(operation.name, "GetContent");
        assert_eq!(operation.kind, OperationKind::Query);
        assert_eq!(operation.options, DirectiveOptions::pointer());
        assert_eq!(operation.variables[0].name, "id");
        match &operation.selection_set[0] {
            Selection::Field(field) => {
                assert_eq!(field.definition.as_ref().map(|d| d.name.as_str()), Some("content"));
            }
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn named_fragments_are_expanded_and_merged() {
        let operations = resolve!(
            r##"
            query Me {
                me { ...UserId name }
                me { ...UserName }
            }

            fragment UserId on User { id }
            fragment UserName on User { name ...UserId }
            "##
        ).unwrap();

        assert_eq!(shape(&operations[0].selection_set), vec!["me { id name }"]);
    }

    #[test]
    fn inline_fragments_on_concrete_types_are_tagged() {
        let operations = resolve!(
            r##"
            query GetContent {
                content(id: "1") {
                    __typename
                    ... on Content { title }
                    ... on Article { text }
                    ... on Video { duration }
                }
            }
            "##
        ).unwrap();

        assert_eq!(
            shape(&operations[0].selection_set),
            vec!["content { __typename title text on Article duration on Video }"]
        );
    }

    #[test]
    fn fragments_on_implemented_interfaces_always_apply() {
        let operations = resolve!(
            r##"
            query Favorite {
                me { favorite { __typename ... on Article { ...ContentTitle } } }
            }

            fragment ContentTitle on Content { title }
            "##
        ).unwrap();

        assert_eq!(
            shape(&operations[0].selection_set),
            vec!["me { favorite { __typename title on Article } }"]
        );
    }

    #[test]
    fn nested_abstract_fragments_keep_every_condition() {
        let schema = SchemaModel::parse(
            r##"
            interface Content { id: ID! }
            interface HasTitle { title: String }
            interface HasMedia { url: String }
            type Article implements Content & HasTitle { id: ID!, title: String }
            type Video implements Content & HasMedia { id: ID!, url: String }
            type Photo implements Content & HasTitle & HasMedia {
                id: ID!
                title: String
                url: String
            }
            type Query { content: Content }
            "##,
        ).unwrap();
        let document = parse_operations(
            r##"
            query Q {
                content {
                    __typename
                    ... on HasTitle { title ... on HasMedia { url } }
                    ... on HasMedia { ... on HasMedia { url } }
                }
            }
            "##,
        ).unwrap();
        let operations = resolve_operations(&schema, &document).unwrap();

        assert_eq!(
            shape(&operations[0].selection_set),
            vec!["content { __typename title on HasTitle url on HasTitle & HasMedia url on HasMedia }"]
        );
    }

    #[test]
    fn unknown_fields_are_left_unbound() {
        let operations = resolve!("query Q { me { furDensity } }").unwrap();
        match &operations[0].selection_set[0] {
            Selection::Field(me) => match &me.selection_set[0] {
                Selection::Field(field) => assert_eq!(field.definition, None),
                other => panic!("unexpected selection {:?}", other),
            },
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn anonymous_operations_are_rejected() {
        let err = resolve!("{ me { id } }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        let err = resolve!("query { me { id } }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn unknown_fragments_are_rejected() {
        let err = resolve!("query Q { me { ...Nope } }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn fragment_cycles_are_rejected() {
        let err = resolve!(
            r##"
            query Q { me { ...A } }
            fragment A on User { id ...B }
            fragment B on User { name ...A }
            "##
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn conflicting_aliases_are_rejected() {
        let err = resolve!("query Q { me { x: id x: name } }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
