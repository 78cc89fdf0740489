use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A pointer to a type as it appears on properties, parameters and responses:
/// a primitive `type`/`format` pair, a local `$ref`, or an array wrapper.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaReference {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaReference>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,
}

impl SchemaReference {
    /// A `$ref` pointer, e.g. `#/definitions/Widget`.
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: Some(ref_path.into()),
            ..Self::default()
        }
    }

    /// A bare primitive with an optional format.
    pub fn primitive(schema_type: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    /// An array wrapping `items`.
    pub fn array(items: SchemaReference) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// True for `type: array` references that declare their `items`.
    pub fn is_array(&self) -> bool {
        self.schema_type.as_deref() == Some("array") && self.items.is_some()
    }
}

/// `additionalProperties` can be a boolean or a value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaReference>),
}

/// A named entry of `definitions` / `components.schemas`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaReference>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,
}

impl Schema {
    /// View the schema's own shape as a reference, used to resolve what an
    /// alias schema wraps.
    pub fn as_reference(&self) -> SchemaReference {
        SchemaReference {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            ref_path: self.ref_path.clone(),
            items: self.items.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }
}
