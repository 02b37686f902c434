//! The intermediate representation handed to a renderer.
//!
//! Named shapes (structs, interfaces, enums) live in the `TypeRegistry` and are referenced by
//! generated name, which lets recursive selections point back at a type that is still being
//! built. Lists, optionals and opaque references are structural and never registered.

use errors::Position;
use selection::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeNode {
    /// A pre-existing host type: a builtin scalar mapping or a configured scalar binding.
    Opaque(String),
    List(Box<TypeNode>),
    Optional(Box<TypeNode>),
    Struct(String),
    Interface(String),
    Enum(String),
}

impl TypeNode {
    pub fn list(elem: TypeNode) -> TypeNode {
        TypeNode::List(Box::new(elem))
    }

    pub fn optional(elem: TypeNode) -> TypeNode {
        TypeNode::Optional(Box::new(elem))
    }

    /// Name of the registered type this node refers to, looking through lists and optionals.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            TypeNode::Opaque(_) => None,
            TypeNode::List(elem) | TypeNode::Optional(elem) => elem.referenced_name(),
            TypeNode::Struct(name) | TypeNode::Interface(name) | TypeNode::Enum(name) => {
                Some(name.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructField {
    pub name: String,
    pub field_type: TypeNode,
    /// Key of the field in the transport payload.
    pub json_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructType {
    pub name: String,
    pub description: Option<String>,
    pub graphql_name: String,
    pub fields: Vec<StructField>,
    /// Set while the fields are being filled in.
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub graphql_name: String,
    /// Generated struct names, one per possible concrete type, in schema order.
    pub implementations: Vec<String>,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// The value as it appears on the wire.
    pub name: String,
    pub variant: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub graphql_name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeDef {
    Struct(StructType),
    Interface(InterfaceType),
    Enum(EnumType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Struct(ty) => &ty.name,
            TypeDef::Interface(ty) => &ty.name,
            TypeDef::Enum(ty) => &ty.name,
        }
    }

    pub fn graphql_name(&self) -> &str {
        match self {
            TypeDef::Struct(ty) => &ty.graphql_name,
            TypeDef::Interface(ty) => &ty.graphql_name,
            TypeDef::Enum(ty) => &ty.graphql_name,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        match self {
            TypeDef::Struct(ty) => ty.incomplete,
            TypeDef::Interface(ty) => ty.incomplete,
            TypeDef::Enum(_) => false,
        }
    }

    /// A reference to this definition.
    pub fn node(&self) -> TypeNode {
        match self {
            TypeDef::Struct(ty) => TypeNode::Struct(ty.name.clone()),
            TypeDef::Interface(ty) => TypeNode::Interface(ty.name.clone()),
            TypeDef::Enum(ty) => TypeNode::Enum(ty.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub arg_type: TypeNode,
    pub json_name: String,
}

/// Everything a renderer needs to emit one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationTypes {
    pub name: String,
    pub kind: OperationKind,
    pub position: Position,
    pub response: TypeNode,
    pub arguments: Vec<Argument>,
}
