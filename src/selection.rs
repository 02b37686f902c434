//! Operations with every field bound to its schema definition and every fragment expanded.
//!
//! This is the input of the type conversion in `convert`; it is produced by `resolve`.

use errors::Position;
use graphql_parser::query::Type;
use options::DirectiveOptions;
use schema::{FieldDefinition, SchemaModel, TYPENAME_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: String,
    pub position: Position,
    pub options: DirectiveOptions,
    pub variables: Vec<Variable>,
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(SelectedField),
    /// Only present when the flattening stage was skipped.
    FragmentSpread { name: String, position: Position },
    /// Only present when the flattening stage was skipped.
    InlineFragment {
        type_condition: Option<String>,
        position: Position,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedField {
    /// Response key: the alias if there is one, the field name otherwise.
    pub alias: String,
    pub name: String,
    pub position: Position,
    pub definition: Option<FieldDefinition>,
    pub options: DirectiveOptions,
    /// Fragment type conditions the field was selected through, outermost first, when they
    /// only apply to some of the concrete types of the enclosing selection. A concrete type
    /// receives the field only if every condition applies to it.
    pub type_conditions: Vec<String>,
    pub selection_set: Vec<Selection>,
}

impl SelectedField {
    pub fn is_typename(&self) -> bool {
        self.name == TYPENAME_FIELD
    }
}

/// Whether the selection set requests the discriminator for every possible type.
pub fn requests_typename(selection_set: &[Selection]) -> bool {
    selection_set.iter().any(|selection| match selection {
        Selection::Field(field) => field.is_typename() && field.type_conditions.is_empty(),
        _ => false,
    })
}

/// Adds `field` to `selection_set`, merging it into an earlier selection of the same response
/// key and type conditions.
///
/// Returns the alias on conflict, i.e. when the same response key selects different fields.
pub fn merge_field(selection_set: &mut Vec<Selection>, field: SelectedField) -> Result<(), String> {
    let existing = selection_set.iter_mut().find(|selection| match selection {
        Selection::Field(existing) => {
            existing.alias == field.alias && existing.type_conditions == field.type_conditions
        }
        _ => false,
    });

    match existing {
        Some(Selection::Field(existing)) => {
            if existing.name != field.name {
                return Err(field.alias);
            }
            existing.options = existing.options.merge(&field.options);
            for child in field.selection_set {
                match child {
                    Selection::Field(child) => merge_field(&mut existing.selection_set, child)?,
                    other => existing.selection_set.push(other),
                }
            }
            Ok(())
        }
        _ => {
            selection_set.push(Selection::Field(field));
            Ok(())
        }
    }
}

/// The part of `selection_set` that applies to values of the object type `object`, with the
/// fields reached through different fragments merged together.
pub fn narrow_to_object(
    schema: &SchemaModel,
    object: &str,
    selection_set: &[Selection],
) -> Result<Vec<Selection>, String> {
    let mut narrowed = Vec::with_capacity(selection_set.len());

    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                let applies = field
                    .type_conditions
                    .iter()
                    .all(|condition| schema.applies_to(condition, object));
                if applies {
                    let mut field = field.clone();
                    field.type_conditions.clear();
                    merge_field(&mut narrowed, field)?;
                }
            }
            other => narrowed.push(other.clone()),
        }
    }

    Ok(narrowed)
}
