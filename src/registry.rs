use errors::{GenerateError, Location};
use std::collections::{BTreeMap, HashMap};
use types::{TypeDef, TypeNode};

/// All named types of one generation run, keyed by generated name.
///
/// The registry is owned by the run and discarded with it; types are sorted by name so the
/// renderer output is deterministic.
#[derive(Debug, Default, Serialize)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDef>,
    /// Schema type name to generated name, for enums and input objects.
    #[serde(skip)]
    canonical: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// The node already generated for an enum or input object, if any.
    pub fn canonical(&self, graphql_name: &str) -> Option<TypeNode> {
        self.canonical
            .get(graphql_name)
            .and_then(|name| self.get(name))
            .map(TypeDef::node)
    }

    /// Registers a type whose children are about to be built.
    ///
    /// A name that is already complete is left alone: whatever is built now is compared to it
    /// in `finish`. A name that is still incomplete belongs to an enclosing build, so reaching
    /// it again is a collision.
    pub fn declare(&mut self, def: TypeDef, location: Location) -> Result<(), GenerateError> {
        if let Some(existing) = self.types.get(def.name()) {
            if existing.is_incomplete() {
                return Err(GenerateError::duplicate(location, def.name()));
            }
            return Ok(());
        }

        trace!("declared {}", def.name());
        self.types.insert(def.name().to_string(), def);
        Ok(())
    }

    /// Stores a fully built type. Identical definitions under one name are shared; different
    /// ones are a collision.
    pub fn finish(&mut self, def: TypeDef, location: Location) -> Result<TypeNode, GenerateError> {
        let node = def.node();

        let replace = match self.types.get(def.name()) {
            Some(existing) if existing.is_incomplete() => true,
            Some(existing) if existing == &def => false,
            Some(_) => return Err(GenerateError::duplicate(location, def.name())),
            None => true,
        };

        if replace {
            trace!("registered {} ({})", def.name(), def.graphql_name());
            if let TypeDef::Enum(_) = def {
                self.canonical
                    .insert(def.graphql_name().to_string(), def.name().to_string());
            }
            self.types.insert(def.name().to_string(), def);
        }

        Ok(node)
    }

    /// Records `name` as the one generated shape of the schema type `graphql_name`.
    pub fn set_canonical(&mut self, graphql_name: &str, name: &str) {
        self.canonical
            .insert(graphql_name.to_string(), name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::ErrorKind;
    use types::{EnumType, StructField, StructType};

    fn user(incomplete: bool, fields: &[&str]) -> TypeDef {
        TypeDef::Struct(StructType {
            name: "GetUserUser".to_string(),
            description: None,
            graphql_name: "User".to_string(),
            fields: fields
                .iter()
                .map(|name| StructField {
                    name: name.to_string(),
                    field_type: TypeNode::Opaque("String".to_string()),
                    json_name: name.to_string(),
                    description: None,
                })
                .collect(),
            incomplete,
        })
    }

    #[test]
    fn declare_then_finish() {
        let mut registry = TypeRegistry::new();
        registry.declare(user(true, &[]), Location::unknown()).unwrap();
        assert!(registry.get("GetUserUser").unwrap().is_incomplete());

        let node = registry
            .finish(user(false, &["id"]), Location::unknown())
            .unwrap();
        assert_eq!(node, TypeNode::Struct("GetUserUser".to_string()));
        assert!(!registry.get("GetUserUser").unwrap().is_incomplete());
    }

    #[test]
    fn declaring_an_incomplete_name_is_a_collision() {
        let mut registry = TypeRegistry::new();
        registry.declare(user(true, &[]), Location::unknown()).unwrap();
        let err = registry
            .declare(user(true, &[]), Location::unknown())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateDefinition);
    }

    #[test]
    fn identical_definitions_are_shared() {
        let mut registry = TypeRegistry::new();
        registry.finish(user(false, &["id"]), Location::unknown()).unwrap();
        registry.declare(user(true, &[]), Location::unknown()).unwrap();
        registry.finish(user(false, &["id"]), Location::unknown()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_definitions_under_one_name_are_rejected() {
        let mut registry = TypeRegistry::new();
        registry.finish(user(false, &["id"]), Location::unknown()).unwrap();
        let err = registry
            .finish(user(false, &["name"]), Location::unknown())
            .unwrap_err();
        assert_eq!(
            err,
            GenerateError::DuplicateDefinition {
                location: Location::unknown(),
                name: "GetUserUser".to_string(),
            }
        );
    }

    #[test]
    fn enums_are_canonical() {
        let mut registry = TypeRegistry::new();
        let role = TypeDef::Enum(EnumType {
            name: "Role".to_string(),
            description: None,
            graphql_name: "Role".to_string(),
            values: Vec::new(),
        });
        registry.finish(role, Location::unknown()).unwrap();
        assert_eq!(
            registry.canonical("Role"),
            Some(TypeNode::Enum("Role".to_string()))
        );
        assert_eq!(registry.canonical("User"), None);
    }
}
