use std::fmt;

use crate::error::ExtractError;

/// The raw `type` keyword of a schema or reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl PrimitiveType {
    pub fn parse(value: &str) -> Result<Self, ExtractError> {
        match value {
            "string" => Ok(PrimitiveType::String),
            "integer" => Ok(PrimitiveType::Integer),
            "number" => Ok(PrimitiveType::Number),
            "boolean" => Ok(PrimitiveType::Boolean),
            "object" => Ok(PrimitiveType::Object),
            "array" => Ok(PrimitiveType::Array),
            other => Err(ExtractError::UnknownPrimitiveType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
        }
    }
}

/// Where an operation parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSource {
    Path,
    Body,
    Query,
}

impl ParameterSource {
    pub fn parse(value: &str) -> Result<Self, ExtractError> {
        match value {
            "path" => Ok(ParameterSource::Path),
            "body" => Ok(ParameterSource::Body),
            "query" => Ok(ParameterSource::Query),
            other => Err(ExtractError::UnknownParameterSource(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterSource::Path => "path",
            ParameterSource::Body => "body",
            ParameterSource::Query => "query",
        }
    }
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn parse(value: &str) -> Result<Self, ExtractError> {
        match value {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            other => Err(ExtractError::UnknownHttpMethod(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of a resolved type: a primitive name such as `long`
/// or `datetime`, or the declared key of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMetadata {
    pub name: String,
    /// Value type name of a map-like `object`, from `additionalProperties`.
    pub additional_properties: Option<String>,
}

impl TypeMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            additional_properties: None,
        }
    }
}

/// A type plus the array flag; array-ness never folds into the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReferenceMetadata {
    pub type_metadata: TypeMetadata,
    pub is_array: bool,
}

impl TypeReferenceMetadata {
    pub fn name(&self) -> &str {
        &self.type_metadata.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMetadata {
    pub name: String,
    pub required: bool,
    pub type_reference: TypeReferenceMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMetadata {
    pub name: String,
    pub schema_type: Option<PrimitiveType>,
    pub properties: Vec<PropertyMetadata>,
    pub enum_values: Vec<String>,
    /// What a scalar or array schema wraps; `None` for objects and enums.
    pub alias_of: Option<TypeReferenceMetadata>,
    /// Schemas whose name marks a type the target language already provides
    /// (e.g. `Tuple...`).
    pub is_language_specific: bool,
    pub description: Option<String>,
}

impl SchemaMetadata {
    /// Names this schema needs resolved before it can be built.
    pub fn dependency_names(&self) -> Vec<String> {
        if let Some(alias) = self.alias_of.as_ref().filter(|_| self.is_alias()) {
            return vec![alias.name().to_string()];
        }
        self.properties
            .iter()
            .map(|p| p.type_reference.name().to_string())
            .collect()
    }

    pub fn is_object(&self) -> bool {
        self.schema_type == Some(PrimitiveType::Object)
    }

    pub fn is_enum(&self) -> bool {
        !self.is_object() && !self.enum_values.is_empty()
    }

    pub fn is_alias(&self) -> bool {
        !self.is_object() && !self.is_enum() && self.alias_of.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub name: String,
    pub description: String,
    pub source: ParameterSource,
    pub required: bool,
    pub type_reference: TypeReferenceMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetadata {
    pub description: String,
    pub response_code: String,
    pub type_reference: TypeReferenceMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationMetadata {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    pub description: String,
    pub parameters: Vec<ParameterMetadata>,
    pub responses: Vec<ResponseMetadata>,
}

impl OperationMetadata {
    /// Parameter type names followed by response type names.
    pub fn dependency_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_reference.name().to_string())
            .chain(
                self.responses
                    .iter()
                    .map(|r| r.type_reference.name().to_string()),
            )
            .collect()
    }
}

/// Stand-in for a name referenced as a dependency that no extracted entity
/// declares, such as a bare primitive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMetadata {
    pub name: String,
}

/// Language-independent description of everything the pipeline builds types
/// from.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityMetadata {
    Schema(SchemaMetadata),
    Operation(OperationMetadata),
    Placeholder(PlaceholderMetadata),
}

impl EntityMetadata {
    pub fn name(&self) -> &str {
        match self {
            EntityMetadata::Schema(s) => &s.name,
            EntityMetadata::Operation(o) => &o.name,
            EntityMetadata::Placeholder(p) => &p.name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityMetadata::Operation(_) => EntityKind::Operation,
            EntityMetadata::Schema(_) | EntityMetadata::Placeholder(_) => EntityKind::Schema,
        }
    }

    pub fn dependency_names(&self) -> Vec<String> {
        match self {
            EntityMetadata::Schema(s) => s.dependency_names(),
            EntityMetadata::Operation(o) => o.dependency_names(),
            EntityMetadata::Placeholder(_) => Vec::new(),
        }
    }
}

/// The namespace an entity name lives in. Names are unique per kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Schema,
    Operation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Schema => f.write_str("schema"),
            EntityKind::Operation => f.write_str("operation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> TypeReferenceMetadata {
        TypeReferenceMetadata {
            type_metadata: TypeMetadata::named(name),
            is_array: false,
        }
    }

    fn schema(schema_type: Option<PrimitiveType>) -> SchemaMetadata {
        SchemaMetadata {
            name: "Thing".to_string(),
            schema_type,
            properties: Vec::new(),
            enum_values: Vec::new(),
            alias_of: None,
            is_language_specific: false,
            description: None,
        }
    }

    #[test]
    fn test_vocabulary_rejects_unknown_values() {
        assert!(matches!(
            PrimitiveType::parse("file"),
            Err(ExtractError::UnknownPrimitiveType(t)) if t == "file"
        ));
        assert!(matches!(
            ParameterSource::parse("header"),
            Err(ExtractError::UnknownParameterSource(s)) if s == "header"
        ));
        assert!(matches!(
            HttpMethod::parse("head"),
            Err(ExtractError::UnknownHttpMethod(m)) if m == "head"
        ));
    }

    #[test]
    fn test_schema_shape_predicates() {
        let mut object = schema(Some(PrimitiveType::Object));
        object.enum_values = vec!["ignored".to_string()];
        assert!(object.is_object());
        assert!(!object.is_enum());

        let mut enumeration = schema(Some(PrimitiveType::String));
        enumeration.enum_values = vec!["A".to_string()];
        enumeration.alias_of = Some(reference("string"));
        assert!(enumeration.is_enum());
        assert!(!enumeration.is_alias());
        assert!(enumeration.dependency_names().is_empty());

        let mut alias = schema(Some(PrimitiveType::String));
        alias.alias_of = Some(reference("datetime"));
        assert!(alias.is_alias());
        assert_eq!(alias.dependency_names(), vec!["datetime".to_string()]);

        let bare = schema(None);
        assert!(!bare.is_object() && !bare.is_enum() && !bare.is_alias());
    }

    #[test]
    fn test_operation_dependency_order() {
        let op = OperationMetadata {
            name: "getPerson".to_string(),
            path: "/people/{id}".to_string(),
            method: HttpMethod::Get,
            tags: vec!["People".to_string()],
            description: String::new(),
            parameters: vec![ParameterMetadata {
                name: "id".to_string(),
                description: String::new(),
                source: ParameterSource::Path,
                required: true,
                type_reference: reference("long"),
            }],
            responses: vec![ResponseMetadata {
                description: String::new(),
                response_code: "200".to_string(),
                type_reference: reference("Person"),
            }],
        };
        assert_eq!(
            op.dependency_names(),
            vec!["long".to_string(), "Person".to_string()]
        );
    }
}
