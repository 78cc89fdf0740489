use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaReference;

/// A path item. Kept as raw JSON so that method keys outside the supported
/// vocabulary can be reported instead of silently dropped.
pub type PathItem = IndexMap<String, serde_json::Value>;

/// Path-item keys that never hold an operation.
pub const NON_OPERATION_KEYS: &[&str] = &["parameters", "summary", "description", "servers", "$ref"];

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Option<Response>>,
}

/// An operation parameter. Swagger 2 non-body parameters carry their type
/// inline, which lands in `inline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaReference>,

    #[serde(rename = "x-schema", skip_serializing_if = "Option::is_none")]
    pub x_schema: Option<SchemaReference>,

    #[serde(flatten)]
    pub inline: SchemaReference,
}

impl Parameter {
    /// The schema describing this parameter's value: the `x-schema` override,
    /// then the inline `schema`, then the parameter object itself.
    pub fn effective_schema(&self) -> &SchemaReference {
        self.x_schema
            .as_ref()
            .or(self.schema.as_ref())
            .unwrap_or(&self.inline)
    }
}

/// A response entry of an operation, or a `$ref` to one declared elsewhere
/// in the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Swagger 2 response body schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaReference>,

    /// OpenAPI 3 response bodies keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// The body schema, preferring `application/json`, then `text/plain`,
    /// then whichever media type is declared first.
    pub fn body_schema(&self) -> Option<&SchemaReference> {
        if let Some(schema) = self.schema.as_ref() {
            return Some(schema);
        }
        self.content
            .get("application/json")
            .or_else(|| self.content.get("text/plain"))
            .or_else(|| self.content.values().next())
            .and_then(|mt| mt.schema.as_ref())
    }
}

/// A media type entry under `content`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaReference>,
}
