// This module implements the core of the generator: walking an operation (and the schema it
// will run against) and deciding which types to generate for it. The resulting types are
// defined in `types` and collected in a `TypeRegistry`.
//
// The entrypoints are `Generator::convert_operation`, which builds the response type of an
// operation, and `Generator::convert_arguments`, which builds its argument types.

use config::{builtin_type, Config};
use errors::{GenerateError, Location, Position};
use graphql_parser::query::Type;
use graphql_parser::schema::TypeDefinition;
use heck::CamelCase;
use naming::{match_first, type_name, upper_first};
use options::DirectiveOptions;
use registry::TypeRegistry;
use schema::{self, SchemaModel, TypeKind};
use selection::{narrow_to_object, requests_typename, Operation, OperationKind, SelectedField,
                Selection};
use shared::{extract_inner_name, list_element};
use types::{Argument, EnumType, EnumValue, InterfaceType, OperationTypes, StructField,
            StructType, TypeDef, TypeNode};

pub struct Generator<'a> {
    schema: &'a SchemaModel,
    config: &'a Config,
    registry: TypeRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(schema: &'a SchemaModel, config: &'a Config) -> Generator<'a> {
        Generator {
            schema,
            config,
            registry: TypeRegistry::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }

    /// The schema type to which the root of an operation corresponds, e.g. `Query`.
    fn base_type_for_operation(
        &self,
        operation: &Operation,
    ) -> Result<&'a TypeDefinition, GenerateError> {
        let location = Location::from(operation.position);

        if operation.kind == OperationKind::Subscription && !self.config.allow_broken_features {
            return Err(GenerateError::not_supported(location, "subscription"));
        }

        self.schema.root_type(operation.kind).ok_or_else(|| {
            GenerateError::internal(
                location,
                format!("schema has no root type for {:?} operations", operation.kind),
            )
        })
    }

    /// Builds the response type and the argument types of an operation.
    pub fn convert_operation(
        &mut self,
        operation: &Operation,
    ) -> Result<OperationTypes, GenerateError> {
        debug!("converting {:?} {}", operation.kind, operation.name);

        let name = format!("{}Response", operation.name);
        let location = Location::from(operation.position);

        if self.registry.contains(&name) {
            return Err(GenerateError::duplicate(location, name));
        }

        let base_type = self.base_type_for_operation(operation)?;
        let description = format!("{} is returned by {} on success.", name, operation.name);

        let response = match base_type {
            TypeDefinition::Object(_) => self.convert_object(
                &name,
                &operation.name,
                base_type,
                Some(description),
                operation.position,
                &operation.selection_set,
                &operation.options,
            )?,
            _ => {
                return Err(GenerateError::internal(
                    location,
                    format!("root type {} is not an object", schema::type_name(base_type)),
                ))
            }
        };

        let arguments = self.convert_arguments(operation)?;

        Ok(OperationTypes {
            name: operation.name.clone(),
            kind: operation.kind,
            position: operation.position,
            response,
            arguments,
        })
    }

    /// One argument per operation variable.
    pub fn convert_arguments(
        &mut self,
        operation: &Operation,
    ) -> Result<Vec<Argument>, GenerateError> {
        let mut arguments = Vec::with_capacity(operation.variables.len());

        for variable in operation.variables.iter() {
            let arg_type = self.convert_input_type(
                &operation.name,
                &variable.var_type,
                variable.position,
                &operation.options,
            )?;
            arguments.push(Argument {
                name: variable.name.clone(),
                arg_type,
                json_name: variable.name.clone(),
            });
        }

        Ok(arguments)
    }

    fn convert_input_type(
        &mut self,
        operation_name: &str,
        typ: &Type,
        position: Position,
        options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        // Purely cosmetic: the registry still keeps one shape per input type.
        let name = match_first(&upper_first(extract_inner_name(typ)), operation_name);
        self.convert_type(&name, "", typ, position, &[], options, options)
    }

    /// Converts the type of a field, which may be a list or a named type.
    ///
    /// Lists are transparent to naming: the element is what gets named. The optional
    /// wrapper goes around the named type, after list recursion, so a list field with the
    /// pointer option becomes a list of optionals, never an optional list.
    fn convert_type(
        &mut self,
        name: &str,
        prefix: &str,
        typ: &Type,
        position: Position,
        selection_set: &[Selection],
        options: &DirectiveOptions,
        query_options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        if let Some(elem) = list_element(typ) {
            let elem = self.convert_type(
                name,
                prefix,
                elem,
                position,
                selection_set,
                options,
                query_options,
            )?;
            return Ok(TypeNode::list(elem));
        }

        let graphql_name = extract_inner_name(typ);
        let schema_model = self.schema;
        let def = schema_model.get(graphql_name).ok_or_else(|| {
            GenerateError::internal(position, format!("unknown type {}", graphql_name))
        })?;

        let converted =
            self.convert_definition(name, prefix, def, position, selection_set, query_options)?;

        if options.get_pointer() {
            return Ok(TypeNode::optional(converted));
        }
        Ok(converted)
    }

    /// Converts a schema named type.
    fn convert_definition(
        &mut self,
        name: &str,
        prefix: &str,
        def: &'a TypeDefinition,
        position: Position,
        selection_set: &[Selection],
        query_options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        let graphql_name = schema::type_name(def);

        if let Some(host_type) = self.config.scalars.get(graphql_name) {
            return Ok(TypeNode::Opaque(host_type.clone()));
        }
        if let Some(host_type) = builtin_type(graphql_name) {
            return Ok(TypeNode::Opaque(host_type.to_string()));
        }

        match def {
            TypeDefinition::Object(_) => self.convert_object(
                name,
                prefix,
                def,
                None,
                position,
                selection_set,
                query_options,
            ),
            TypeDefinition::InputObject(_) => self.convert_input_object(name, def, query_options),
            TypeDefinition::Interface(_) | TypeDefinition::Union(_) => self.convert_abstract(
                name,
                prefix,
                def,
                position,
                selection_set,
                query_options,
            ),
            TypeDefinition::Enum(_) => self.convert_enum(name, def),
            TypeDefinition::Scalar(_) => Err(GenerateError::UnknownScalar {
                location: Location::at(position),
                name: graphql_name.to_string(),
            }),
        }
    }

    fn convert_object(
        &mut self,
        name: &str,
        prefix: &str,
        def: &'a TypeDefinition,
        description: Option<String>,
        position: Position,
        selection_set: &[Selection],
        query_options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        let graphql_name = schema::type_name(def);
        let location = Location::at(position);

        let mut struct_type = StructType {
            name: name.to_string(),
            description: description.or_else(|| schema::type_description(def).cloned()),
            graphql_name: graphql_name.to_string(),
            fields: Vec::new(),
            incomplete: true,
        };
        self.registry
            .declare(TypeDef::Struct(struct_type.clone()), location)?;

        let selection_set = narrow_to_object(self.schema, graphql_name, selection_set)
            .map_err(|alias| {
                GenerateError::internal(location, format!("conflicting selections for {}", alias))
            })?;

        for selection in selection_set.iter() {
            match selection {
                Selection::Field(field) => {
                    let field_options = query_options.merge(&field.options);
                    let field =
                        self.convert_field(prefix, field, &field_options, query_options)?;
                    struct_type.fields.push(field);
                }
                Selection::FragmentSpread { name, position } => {
                    return Err(GenerateError::internal(
                        *position,
                        format!("not implemented: fragment spread ...{}", name),
                    ))
                }
                Selection::InlineFragment { position, .. } => {
                    return Err(GenerateError::internal(
                        *position,
                        "not implemented: inline fragment",
                    ))
                }
            }
        }

        struct_type.incomplete = false;
        self.registry.finish(TypeDef::Struct(struct_type), location)
    }

    /// Input objects are generated whole, from the schema, whatever the caller supplies.
    fn convert_input_object(
        &mut self,
        name: &str,
        def: &'a TypeDefinition,
        query_options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        let input_type = match def {
            TypeDefinition::InputObject(input_type) => input_type,
            other => {
                return Err(GenerateError::internal(
                    Location::unknown(),
                    format!("{} is not an input object", schema::type_name(other)),
                ))
            }
        };
        if let Some(existing) = self.registry.canonical(&input_type.name) {
            return Ok(existing);
        }

        let location = Location::at(input_type.position);
        let mut struct_type = StructType {
            name: name.to_string(),
            description: input_type.description.clone(),
            graphql_name: input_type.name.clone(),
            fields: Vec::with_capacity(input_type.fields.len()),
            incomplete: true,
        };
        self.registry.set_canonical(&input_type.name, name);
        self.registry
            .declare(TypeDef::Struct(struct_type.clone()), location)?;

        for field in input_type.fields.iter() {
            // No field-level options here: this field belongs to the type, not to a selection.
            let field_name = upper_first(extract_inner_name(&field.value_type));
            let field_type = self.convert_type(
                &field_name,
                "",
                &field.value_type,
                field.position.into(),
                &[],
                query_options,
                query_options,
            )?;

            struct_type.fields.push(StructField {
                name: upper_first(&field.name),
                field_type,
                json_name: field.name.clone(),
                description: field.description.clone(),
            });
        }

        struct_type.incomplete = false;
        self.registry.finish(TypeDef::Struct(struct_type), location)
    }

    fn convert_abstract(
        &mut self,
        name: &str,
        prefix: &str,
        def: &'a TypeDefinition,
        position: Position,
        selection_set: &[Selection],
        query_options: &DirectiveOptions,
    ) -> Result<TypeNode, GenerateError> {
        let graphql_name = schema::type_name(def);
        let location = Location::at(position);

        if !self.config.allow_broken_features {
            let feature = match TypeKind::of(def) {
                TypeKind::Union => format!("union {}", graphql_name),
                _ => format!("interface {}", graphql_name),
            };
            return Err(GenerateError::not_supported(location, feature));
        }

        if !requests_typename(selection_set) {
            return Err(GenerateError::MissingDiscriminator {
                location,
                type_name: graphql_name.to_string(),
            });
        }

        let mut interface_type = InterfaceType {
            name: name.to_string(),
            description: schema::type_description(def).cloned(),
            graphql_name: graphql_name.to_string(),
            implementations: Vec::new(),
            incomplete: true,
        };
        self.registry
            .declare(TypeDef::Interface(interface_type.clone()), location)?;

        let schema_model = self.schema;
        for implementation in schema_model.possible_types(def)? {
            let (impl_name, impl_prefix) =
                type_name(prefix, schema::type_name(implementation), TypeKind::of(implementation));
            let converted = self.convert_definition(
                &impl_name,
                &impl_prefix,
                implementation,
                position,
                selection_set,
                query_options,
            )?;

            match converted {
                TypeNode::Struct(struct_name) => interface_type.implementations.push(struct_name),
                _ => {
                    // Unreachable on a valid schema.
                    return Err(GenerateError::internal(
                        location,
                        format!(
                            "{} had non-object implementation {}",
                            graphql_name,
                            schema::type_name(implementation)
                        ),
                    ));
                }
            }
        }

        interface_type.incomplete = false;
        self.registry
            .finish(TypeDef::Interface(interface_type), location)
    }

    fn convert_enum(&mut self, name: &str, def: &'a TypeDefinition) -> Result<TypeNode, GenerateError> {
        let enum_type = match def {
            TypeDefinition::Enum(enum_type) => enum_type,
            other => {
                return Err(GenerateError::internal(
                    Location::unknown(),
                    format!("{} is not an enum", schema::type_name(other)),
                ))
            }
        };
        if let Some(existing) = self.registry.canonical(&enum_type.name) {
            return Ok(existing);
        }

        let values = enum_type
            .values
            .iter()
            .map(|value| EnumValue {
                name: value.name.clone(),
                variant: value.name.to_camel_case(),
                description: value.description.clone(),
            })
            .collect();

        self.registry.finish(
            TypeDef::Enum(EnumType {
                name: name.to_string(),
                description: enum_type.description.clone(),
                graphql_name: enum_type.name.clone(),
                values,
            }),
            Location::at(enum_type.position),
        )
    }

    /// Converts a single selected field. Input-object fields are handled in
    /// `convert_input_object`, since they come from the schema rather than the operation.
    fn convert_field(
        &mut self,
        prefix: &str,
        field: &SelectedField,
        field_options: &DirectiveOptions,
        query_options: &DirectiveOptions,
    ) -> Result<StructField, GenerateError> {
        let definition = field.definition.as_ref().ok_or_else(|| GenerateError::UndefinedField {
            location: Location::at(field.position),
            alias: field.alias.clone(),
        })?;

        let field_name = upper_first(&field.alias);

        // The field name is not deduplicated against the prefix the way type names are:
        // `query Q { user { user { id } } }` needs both `QUser` and `QUserUser`. It is also
        // the alias, not the schema name, so that `a: f { x } c: f { y }` gets one type each.
        let graphql_name = extract_inner_name(&definition.field_type);
        let kind = self.schema.kind(graphql_name).ok_or_else(|| {
            GenerateError::internal(field.position, format!("unknown type {}", graphql_name))
        })?;
        let (name, prefix) = type_name(&format!("{}{}", prefix, field_name), graphql_name, kind);

        let field_type = self.convert_type(
            &name,
            &prefix,
            &definition.field_type,
            field.position,
            &field.selection_set,
            field_options,
            query_options,
        )?;

        Ok(StructField {
            name: field_name,
            field_type,
            json_name: field.alias.clone(),
            description: definition.description.clone(),
        })
    }
}
