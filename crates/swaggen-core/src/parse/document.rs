use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::operation::PathItem;
use super::schema::Schema;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI 3 components; only schemas matter here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Option<Schema>>,
}

/// Typed view over a Swagger 2 or OpenAPI 3 document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwaggerSpec {
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub swagger: Option<String>,

    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub openapi: Option<String>,

    #[serde(default)]
    pub info: Info,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, Option<PathItem>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Option<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl SwaggerSpec {
    /// The document's named schemas in declaration order, taken from
    /// `definitions` when present, otherwise from `components.schemas`.
    /// Null entries are skipped.
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        let table = if self.definitions.is_empty() {
            self.components.as_ref().map(|c| &c.schemas)
        } else {
            Some(&self.definitions)
        };
        table
            .into_iter()
            .flatten()
            .filter_map(|(name, schema)| schema.as_ref().map(|s| (name, s)))
    }

    /// The declared document version, e.g. `2.0` or `3.0.1`.
    pub fn version(&self) -> Option<&str> {
        self.swagger.as_deref().or(self.openapi.as_deref())
    }
}

/// A parsed document: the raw JSON tree, walked when following `$ref`
/// pointers, together with its typed view.
#[derive(Debug, Clone)]
pub struct Document {
    raw: serde_json::Value,
    spec: SwaggerSpec,
}

impl Document {
    /// Build a document from an already parsed JSON value.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let spec = SwaggerSpec::deserialize(&raw)?;
        Ok(Self { raw, spec })
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn spec(&self) -> &SwaggerSpec {
        &self.spec
    }
}

/// YAML documents frequently carry `swagger: 2.0` or `version: 1` unquoted.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a version string, found {other}"
        ))),
    }
}
