use crate::error::ExtractError;
use crate::parse::document::Document;
use crate::parse::schema::Schema;

use super::metadata::{PrimitiveType, PropertyMetadata, SchemaMetadata};
use super::reference::get_type_reference;

/// Extract metadata for every named schema in the document, in declaration
/// order.
pub fn get_schemas(document: &Document) -> Result<Vec<SchemaMetadata>, ExtractError> {
    document
        .spec()
        .schemas()
        .map(|(name, schema)| schema_metadata(document, name, schema))
        .collect()
}

fn schema_metadata(
    document: &Document,
    name: &str,
    schema: &Schema,
) -> Result<SchemaMetadata, ExtractError> {
    let schema_type = match schema.schema_type.as_deref() {
        Some(t) => Some(PrimitiveType::parse(t)?),
        None if !schema.properties.is_empty() => Some(PrimitiveType::Object),
        None => None,
    };

    let properties = schema
        .properties
        .iter()
        .map(|(prop_name, prop)| {
            Ok(PropertyMetadata {
                name: prop_name.clone(),
                required: schema.required.contains(prop_name),
                type_reference: get_type_reference(document, prop)?,
            })
        })
        .collect::<Result<Vec<_>, ExtractError>>()?;

    let enum_values: Vec<String> = schema
        .enum_values
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    let wraps_other_type = schema_type != Some(PrimitiveType::Object)
        && enum_values.is_empty()
        && (schema_type.is_some() || schema.ref_path.is_some());
    let alias_of = if wraps_other_type {
        Some(get_type_reference(document, &schema.as_reference())?)
    } else {
        None
    };

    Ok(SchemaMetadata {
        name: name.to_string(),
        schema_type,
        properties,
        enum_values,
        alias_of,
        is_language_specific: name.starts_with("Tuple"),
        description: schema.description.clone(),
    })
}
