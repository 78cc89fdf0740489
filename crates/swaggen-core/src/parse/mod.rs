pub mod document;
pub mod operation;
pub mod schema;

use crate::error::ParseError;
use document::Document;

/// Parse a Swagger/OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let raw: serde_json::Value = serde_yaml_ng::from_str(input)?;
    let document = Document::from_value(raw)?;
    validate_version(&document)?;
    Ok(document)
}

/// Parse a Swagger/OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    let document = Document::from_value(raw)?;
    validate_version(&document)?;
    Ok(document)
}

fn validate_version(document: &Document) -> Result<(), ParseError> {
    match document.spec().version() {
        Some(v) if v.starts_with("2.") || v.starts_with("3.") => Ok(()),
        Some(v) => Err(ParseError::UnsupportedVersion(v.to_string())),
        None => Err(ParseError::UnsupportedVersion("<missing>".to_string())),
    }
}
