use std::collections::HashMap;
use std::fmt;

use crate::error::ResolveError;
use crate::extract::{
    EntityMetadata, HttpMethod, OperationMetadata, ParameterSource, SchemaMetadata,
    TypeReferenceMetadata,
};

/// Handle to a type in a [`super::TypePool`]. Two references point at the same
/// type exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The tag a resolved type was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Schema,
    Enum,
    Alias,
    Operation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Schema => "schema",
            TypeKind::Enum => "enum",
            TypeKind::Alias => "alias",
            TypeKind::Operation => "operation",
        }
    }

    /// Kinds a property, parameter or response may point at.
    pub fn is_dependency_target(&self) -> bool {
        !matches!(self, TypeKind::Operation)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveDef),
    Schema(ObjectType),
    Enum(EnumType),
    Alias(AliasType),
    Operation(OperationType),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Primitive(p) => &p.name,
            Type::Schema(s) => &s.name,
            Type::Enum(e) => &e.name,
            Type::Alias(a) => &a.name,
            Type::Operation(o) => &o.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive(_) => TypeKind::Primitive,
            Type::Schema(_) => TypeKind::Schema,
            Type::Enum(_) => TypeKind::Enum,
            Type::Alias(_) => TypeKind::Alias,
            Type::Operation(_) => TypeKind::Operation,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Types this one links to, in declaration order. May repeat.
    pub fn dependencies(&self) -> Vec<TypeId> {
        match self {
            Type::Primitive(_) | Type::Enum(_) => Vec::new(),
            Type::Schema(s) => s.properties.iter().map(|p| p.type_ref.type_id).collect(),
            Type::Alias(a) => vec![a.target.type_id],
            Type::Operation(o) => o
                .parameters
                .iter()
                .map(|p| p.type_ref.type_id)
                .chain(o.responses.iter().map(|r| r.type_ref.type_id))
                .collect(),
        }
    }
}

/// A link from a property, parameter, response or alias to a pool type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub type_id: TypeId,
    pub is_array: bool,
    /// Value type of a map-like `object`.
    pub map_value_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveDef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub properties: Vec<Property>,
    pub is_language_specific: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasType {
    pub name: String,
    pub description: Option<String>,
    pub target: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationType {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    pub description: String,
    /// Required parameters first, declaration order kept within each group.
    pub parameters: Vec<Parameter>,
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub source: ParameterSource,
    pub required: bool,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub code: String,
    pub description: String,
    pub type_ref: TypeRef,
}

/// Build the resolved type for `metadata`. Every referenced name goes through
/// `dependency`, which must only return types that already exist.
pub fn create_type<F>(metadata: &EntityMetadata, dependency: F) -> Result<Type, ResolveError>
where
    F: Fn(&str) -> Result<TypeId, ResolveError>,
{
    match metadata {
        EntityMetadata::Schema(schema) => create_schema_type(schema, &dependency),
        EntityMetadata::Operation(op) => create_operation_type(op, &dependency),
        EntityMetadata::Placeholder(p) => Ok(Type::Primitive(PrimitiveDef {
            name: p.name.clone(),
        })),
    }
}

fn create_schema_type<F>(schema: &SchemaMetadata, dependency: &F) -> Result<Type, ResolveError>
where
    F: Fn(&str) -> Result<TypeId, ResolveError>,
{
    if schema.is_object() {
        let properties = schema
            .properties
            .iter()
            .map(|p| {
                Ok(Property {
                    name: p.name.clone(),
                    required: p.required,
                    type_ref: link(&p.type_reference, dependency)?,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;
        return Ok(Type::Schema(ObjectType {
            name: schema.name.clone(),
            description: schema.description.clone(),
            properties,
            is_language_specific: schema.is_language_specific,
        }));
    }

    if schema.is_enum() {
        return Ok(Type::Enum(EnumType {
            name: schema.name.clone(),
            description: schema.description.clone(),
            values: schema.enum_values.clone(),
        }));
    }

    if let Some(target) = schema.alias_of.as_ref().filter(|_| schema.is_alias()) {
        return Ok(Type::Alias(AliasType {
            name: schema.name.clone(),
            description: schema.description.clone(),
            target: link(target, dependency)?,
        }));
    }

    Ok(Type::Primitive(PrimitiveDef {
        name: schema.name.clone(),
    }))
}

fn create_operation_type<F>(op: &OperationMetadata, dependency: &F) -> Result<Type, ResolveError>
where
    F: Fn(&str) -> Result<TypeId, ResolveError>,
{
    let mut parameters = op
        .parameters
        .iter()
        .map(|p| {
            Ok(Parameter {
                name: p.name.clone(),
                description: p.description.clone(),
                source: p.source,
                required: p.required,
                type_ref: link(&p.type_reference, dependency)?,
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;
    // Stable: relative order within each group survives.
    parameters.sort_by_key(|p| !p.required);

    let responses = op
        .responses
        .iter()
        .map(|r| {
            Ok(Response {
                code: r.response_code.clone(),
                description: r.description.clone(),
                type_ref: link(&r.type_reference, dependency)?,
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;

    Ok(Type::Operation(OperationType {
        name: op.name.clone(),
        path: op.path.clone(),
        method: op.method,
        tags: op.tags.clone(),
        description: op.description.clone(),
        parameters,
        responses,
    }))
}

fn link<F>(reference: &TypeReferenceMetadata, dependency: &F) -> Result<TypeRef, ResolveError>
where
    F: Fn(&str) -> Result<TypeId, ResolveError>,
{
    Ok(TypeRef {
        type_id: dependency(reference.name())?,
        is_array: reference.is_array,
        map_value_type: reference.type_metadata.additional_properties.clone(),
    })
}

/// Name index over the dependency targets of a growing pool. Operations are
/// never a dependency target; the first type registered under a name wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetIndex {
    by_name: HashMap<String, TypeId>,
}

impl TargetIndex {
    pub fn from_types(types: &[Type]) -> Self {
        let mut index = Self::default();
        for (i, ty) in types.iter().enumerate() {
            index.insert(TypeId(i), ty);
        }
        index
    }

    pub fn insert(&mut self, id: TypeId, ty: &Type) {
        if ty.kind().is_dependency_target() {
            self.by_name.entry(ty.name().to_string()).or_insert(id);
        }
    }

    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }
}

/// Look up already resolved types by exact name.
pub fn get_resolver(index: &TargetIndex) -> impl Fn(&str) -> Result<TypeId, ResolveError> + '_ {
    move |name| {
        index
            .get(name)
            .ok_or_else(|| ResolveError::UnresolvedType(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{
        ParameterMetadata, PlaceholderMetadata, PrimitiveType, PropertyMetadata, ResponseMetadata,
        TypeMetadata,
    };

    fn reference(name: &str, is_array: bool) -> TypeReferenceMetadata {
        TypeReferenceMetadata {
            type_metadata: TypeMetadata::named(name),
            is_array,
        }
    }

    fn primitive(name: &str) -> Type {
        Type::Primitive(PrimitiveDef {
            name: name.to_string(),
        })
    }

    fn schema(name: &str, schema_type: Option<PrimitiveType>) -> SchemaMetadata {
        SchemaMetadata {
            name: name.to_string(),
            schema_type,
            properties: Vec::new(),
            enum_values: Vec::new(),
            alias_of: None,
            is_language_specific: false,
            description: None,
        }
    }

    fn parameter(name: &str, required: bool) -> ParameterMetadata {
        ParameterMetadata {
            name: name.to_string(),
            description: String::new(),
            source: ParameterSource::Query,
            required,
            type_reference: reference("string", false),
        }
    }

    fn operation(parameters: Vec<ParameterMetadata>) -> OperationMetadata {
        OperationMetadata {
            name: "listThings".to_string(),
            path: "/things".to_string(),
            method: HttpMethod::Get,
            tags: vec!["Things".to_string()],
            description: String::new(),
            parameters,
            responses: vec![
                ResponseMetadata {
                    description: "ok".to_string(),
                    response_code: "200".to_string(),
                    type_reference: reference("string", true),
                },
                ResponseMetadata {
                    description: "missing".to_string(),
                    response_code: "404".to_string(),
                    type_reference: reference("void", false),
                },
            ],
        }
    }

    #[test]
    fn test_object_schema_links_properties() {
        let pool = vec![primitive("string"), primitive("long")];
        let mut person = schema("Person", Some(PrimitiveType::Object));
        person.properties = vec![
            PropertyMetadata {
                name: "id".to_string(),
                required: true,
                type_reference: reference("long", false),
            },
            PropertyMetadata {
                name: "nicknames".to_string(),
                required: false,
                type_reference: reference("string", true),
            },
        ];

        let index = TargetIndex::from_types(&pool);
        let ty = create_type(&EntityMetadata::Schema(person), get_resolver(&index)).unwrap();
        let Type::Schema(object) = ty else {
            panic!("expected schema, got {ty:?}");
        };
        assert_eq!(object.properties[0].type_ref.type_id, TypeId(1));
        assert!(object.properties[0].required);
        assert_eq!(object.properties[1].type_ref.type_id, TypeId(0));
        assert!(object.properties[1].type_ref.is_array);
    }

    #[test]
    fn test_enum_values_keep_order() {
        let mut genre = schema("Genre", Some(PrimitiveType::String));
        genre.enum_values = vec!["Rock".to_string(), "Jazz".to_string(), "Blues".to_string()];
        genre.alias_of = Some(reference("string", false));

        let index = TargetIndex::default();
        let ty = create_type(&EntityMetadata::Schema(genre), get_resolver(&index)).unwrap();
        assert_eq!(ty.kind(), TypeKind::Enum);
        let Type::Enum(e) = ty else { unreachable!() };
        assert_eq!(e.values, vec!["Rock", "Jazz", "Blues"]);
    }

    #[test]
    fn test_alias_and_bare_schema() {
        let pool = vec![primitive("datetime")];
        let mut stamp = schema("Timestamp", Some(PrimitiveType::String));
        stamp.alias_of = Some(reference("datetime", false));
        let index = TargetIndex::from_types(&pool);
        let ty = create_type(&EntityMetadata::Schema(stamp), get_resolver(&index)).unwrap();
        let Type::Alias(alias) = ty else {
            panic!("expected alias, got {ty:?}");
        };
        assert_eq!(alias.target.type_id, TypeId(0));

        let bare = create_type(
            &EntityMetadata::Schema(schema("Opaque", None)),
            get_resolver(&index),
        )
        .unwrap();
        assert_eq!(bare, primitive("Opaque"));
    }

    #[test]
    fn test_placeholder_builds_primitive() {
        let placeholder = EntityMetadata::Placeholder(PlaceholderMetadata {
            name: "string".to_string(),
        });
        let index = TargetIndex::default();
        assert_eq!(
            create_type(&placeholder, get_resolver(&index)).unwrap(),
            primitive("string")
        );
    }

    #[test]
    fn test_required_parameters_first() {
        let pool = vec![primitive("string"), primitive("void")];
        let op = operation(vec![
            parameter("b", false),
            parameter("a", true),
            parameter("d", false),
            parameter("c", true),
        ]);

        let index = TargetIndex::from_types(&pool);
        let ty = create_type(&EntityMetadata::Operation(op), get_resolver(&index)).unwrap();
        let Type::Operation(op) = ty else {
            panic!("expected operation, got {ty:?}");
        };
        let names: Vec<_> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b", "d"]);

        let codes: Vec<_> = op.responses.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["200", "404"]);
        assert_eq!(op.responses[1].type_ref.type_id, TypeId(1));
    }

    #[test]
    fn test_unresolved_dependency() {
        let mut person = schema("Person", Some(PrimitiveType::Object));
        person.properties = vec![PropertyMetadata {
            name: "home".to_string(),
            required: false,
            type_reference: reference("Address", false),
        }];
        let index = TargetIndex::default();
        let err = create_type(&EntityMetadata::Schema(person), get_resolver(&index)).unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedType(n) if n == "Address"));
    }

    #[test]
    fn test_operations_are_not_dependency_targets() {
        let op = create_type(
            &EntityMetadata::Operation(operation(Vec::new())),
            |_| Ok(TypeId(0)),
        )
        .unwrap();
        let pool = vec![op];
        let index = TargetIndex::from_types(&pool);
        assert!(index.get("listThings").is_none());
        assert!(get_resolver(&index)("listThings").is_err());
    }
}
