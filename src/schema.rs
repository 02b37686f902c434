use errors::{GenerateError, Location};
use graphql_parser;
use graphql_parser::schema::{Definition, Document, ScalarType, SchemaDefinition, Type,
                             TypeDefinition, TypeExtension};
use graphql_parser::Pos;
use selection::OperationKind;
use std::collections::HashMap;

pub const TYPENAME_FIELD: &str = "__typename";

/// See https://graphql.org/learn/schema/#scalar-types
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn of(def: &TypeDefinition) -> TypeKind {
        match def {
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::Union(_) => TypeKind::Union,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
        }
    }

    pub fn is_abstract(self) -> bool {
        self == TypeKind::Interface || self == TypeKind::Union
    }
}

pub fn type_name(def: &TypeDefinition) -> &str {
    match def {
        TypeDefinition::Scalar(ty) => &ty.name,
        TypeDefinition::Object(ty) => &ty.name,
        TypeDefinition::Interface(ty) => &ty.name,
        TypeDefinition::Union(ty) => &ty.name,
        TypeDefinition::Enum(ty) => &ty.name,
        TypeDefinition::InputObject(ty) => &ty.name,
    }
}

pub fn type_description(def: &TypeDefinition) -> Option<&String> {
    match def {
        TypeDefinition::Scalar(ty) => ty.description.as_ref(),
        TypeDefinition::Object(ty) => ty.description.as_ref(),
        TypeDefinition::Interface(ty) => ty.description.as_ref(),
        TypeDefinition::Union(ty) => ty.description.as_ref(),
        TypeDefinition::Enum(ty) => ty.description.as_ref(),
        TypeDefinition::InputObject(ty) => ty.description.as_ref(),
    }
}

/// The parts of a schema field the generator needs once a selection is bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: Type,
    pub description: Option<String>,
}

/// Read-only view of a parsed schema.
#[derive(Debug)]
pub struct SchemaModel {
    types: HashMap<String, TypeDefinition>,
    /// Object type names in document order, for deterministic interface implementations.
    object_types: Vec<String>,
    schema_type: Option<SchemaDefinition>,
}

impl Default for SchemaModel {
    fn default() -> SchemaModel {
        SchemaModel::new()
    }
}

impl SchemaModel {
    pub fn new() -> SchemaModel {
        let mut types = HashMap::new();

        for name in BUILTIN_SCALARS.iter() {
            types.insert(
                name.to_string(),
                TypeDefinition::Scalar(ScalarType {
                    position: Pos { line: 0, column: 0 },
                    description: None,
                    name: name.to_string(),
                    directives: Vec::new(),
                }),
            );
        }

        SchemaModel {
            types,
            object_types: Vec::new(),
            schema_type: None,
        }
    }

    pub fn parse(source: &str) -> Result<SchemaModel, GenerateError> {
        let document = graphql_parser::parse_schema(source).map_err(|err| GenerateError::Parse {
            document: "schema",
            message: err.to_string(),
        })?;
        SchemaModel::from_document(&document)
    }

    pub fn from_document(document: &Document) -> Result<SchemaModel, GenerateError> {
        let mut schema = SchemaModel::new();

        for definition in document.definitions.iter() {
            match definition {
                Definition::TypeDefinition(type_def) => schema.insert(type_def.clone()),
                Definition::SchemaDefinition(schema_definition) => {
                    schema.set_schema(schema_definition.clone())
                }
                Definition::TypeExtension(extension) => {
                    let (position, name) = extension_name(extension);
                    return Err(GenerateError::not_supported(
                        Location::at(position),
                        format!("type extension of {}", name),
                    ));
                }
                Definition::DirectiveDefinition(_) => (),
            }
        }

        Ok(schema)
    }

    pub fn set_schema(&mut self, schema: SchemaDefinition) {
        self.schema_type = Some(schema)
    }

    pub fn insert(&mut self, def: TypeDefinition) {
        let name = type_name(&def).to_string();
        if let TypeDefinition::Object(_) = def {
            if !self.types.contains_key(&name) {
                self.object_types.push(name.clone());
            }
        }
        self.types.insert(name, def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<TypeKind> {
        self.get(name).map(TypeKind::of)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        self.kind(name).map(TypeKind::is_abstract).unwrap_or(false)
    }

    /// The root object type for an operation kind, if the schema defines one.
    pub fn root_type(&self, kind: OperationKind) -> Option<&TypeDefinition> {
        let declared = self.schema_type.as_ref().map(|schema| match kind {
            OperationKind::Query => schema.query.as_ref(),
            OperationKind::Mutation => schema.mutation.as_ref(),
            OperationKind::Subscription => schema.subscription.as_ref(),
        });

        let name = match declared {
            Some(name) => name.map(|name| name.as_str()),
            None => Some(match kind {
                OperationKind::Query => "Query",
                OperationKind::Mutation => "Mutation",
                OperationKind::Subscription => "Subscription",
            }),
        };

        name.and_then(|name| self.get(name))
    }

    /// Concrete object types a value of `def` may have at runtime, in schema order.
    ///
    /// A union member missing from the schema is an Internal error.
    pub fn possible_types<'a>(
        &'a self,
        def: &'a TypeDefinition,
    ) -> Result<Vec<&'a TypeDefinition>, GenerateError> {
        let possible = match def {
            TypeDefinition::Union(union_type) => union_type
                .types
                .iter()
                .map(|member| {
                    self.get(member).ok_or_else(|| {
                        GenerateError::internal(
                            Location::at(union_type.position),
                            format!("unknown type {} in union {}", member, union_type.name),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            TypeDefinition::Interface(interface_type) => self.object_types
                .iter()
                .filter_map(|name| self.get(name))
                .filter(|possible| match possible {
                    TypeDefinition::Object(obj) => obj.implements_interfaces
                        .iter()
                        .any(|iface| iface == &interface_type.name),
                    _ => false,
                })
                .collect(),
            TypeDefinition::Object(_) => vec![def],
            _ => Vec::new(),
        };

        Ok(possible)
    }

    /// Whether a selection narrowed to `condition` applies to values of the object type `object`.
    pub fn applies_to(&self, condition: &str, object: &str) -> bool {
        if condition == object {
            return true;
        }

        match self.get(condition) {
            Some(def) => self.possible_types(def)
                .map(|possible| possible.iter().any(|possible| type_name(possible) == object))
                .unwrap_or(false),
            None => false,
        }
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<FieldDefinition> {
        let def = self.get(type_name)?;

        if field_name == TYPENAME_FIELD {
            return match TypeKind::of(def) {
                TypeKind::Object | TypeKind::Interface | TypeKind::Union => {
                    Some(FieldDefinition {
                        name: TYPENAME_FIELD.to_string(),
                        field_type: Type::NonNullType(Box::new(Type::NamedType(
                            "String".to_string(),
                        ))),
                        description: Some(
                            "The name of the current Object type at runtime.".to_string(),
                        ),
                    })
                }
                _ => None,
            };
        }

        let fields = match def {
            TypeDefinition::Object(obj) => &obj.fields,
            TypeDefinition::Interface(iface) => &iface.fields,
            _ => return None,
        };

        fields
            .iter()
            .find(|field| field.name == field_name)
            .map(|field| FieldDefinition {
                name: field.name.clone(),
                field_type: field.field_type.clone(),
                description: field.description.clone(),
            })
    }
}

fn extension_name(extension: &TypeExtension) -> (Pos, &str) {
    match extension {
        TypeExtension::Scalar(ext) => (ext.position, &ext.name),
        TypeExtension::Object(ext) => (ext.position, &ext.name),
        TypeExtension::Interface(ext) => (ext.position, &ext.name),
        TypeExtension::Union(ext) => (ext.position, &ext.name),
        TypeExtension::Enum(ext) => (ext.position, &ext.name),
        TypeExtension::InputObject(ext) => (ext.position, &ext.name),
    }
}
