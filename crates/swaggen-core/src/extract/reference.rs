use crate::error::ExtractError;
use crate::parse::document::Document;
use crate::parse::schema::{AdditionalProperties, SchemaReference};

use super::metadata::{PrimitiveType, TypeMetadata, TypeReferenceMetadata};

/// Name used for responses that carry no body.
pub const VOID: &str = "void";

const FORMATS: &[&str] = &[
    "int32",
    "int64",
    "float",
    "double",
    "byte",
    "binary",
    "date",
    "date-time",
    "password",
    "uuid",
];

/// Every name primitive resolution can produce.
const PRIMITIVE_NAMES: &[&str] = &[
    "string", "byte", "binary", "date", "datetime", "password", "uuid", "integer", "long",
    "float", "double", "boolean", "object", "array", VOID,
];

pub fn is_primitive_name(name: &str) -> bool {
    PRIMITIVE_NAMES.contains(&name)
}

/// The reference a response without a body resolves to.
pub fn void_reference() -> TypeReferenceMetadata {
    TypeReferenceMetadata {
        type_metadata: TypeMetadata::named(VOID),
        is_array: false,
    }
}

/// Resolve a reference to its canonical type. Arrays resolve to their
/// element type; see [`get_type_reference`] for the array flag.
pub fn get_type(
    document: &Document,
    reference: &SchemaReference,
) -> Result<TypeMetadata, ExtractError> {
    if let Some(items) = reference.items.as_deref().filter(|_| reference.is_array()) {
        return get_type(document, items);
    }

    if let Some(ref_path) = reference.ref_path.as_deref() {
        return resolve_ref(document, ref_path).map(TypeMetadata::named);
    }

    get_primitive_type(reference)
}

/// Resolve a reference together with whether it is an array wrapper.
pub fn get_type_reference(
    document: &Document,
    reference: &SchemaReference,
) -> Result<TypeReferenceMetadata, ExtractError> {
    Ok(TypeReferenceMetadata {
        type_metadata: get_type(document, reference)?,
        is_array: reference.is_array(),
    })
}

/// Map a `(type, format)` pair to its canonical primitive name.
pub fn get_primitive_type(reference: &SchemaReference) -> Result<TypeMetadata, ExtractError> {
    let type_name = reference
        .schema_type
        .as_deref()
        .ok_or_else(|| ExtractError::UnknownPrimitiveType("<missing>".to_string()))?;
    let primitive = PrimitiveType::parse(type_name)?;
    let format = reference.format.as_deref();

    if let Some(f) = format
        && !FORMATS.contains(&f)
    {
        return Err(unknown_format(type_name, f));
    }

    let name = match (primitive, format) {
        (PrimitiveType::String, None) => "string",
        (PrimitiveType::String, Some(f)) => match f {
            "byte" => "byte",
            "binary" => "binary",
            "date" => "date",
            "date-time" => "datetime",
            "password" => "password",
            "uuid" => "uuid",
            other => return Err(unknown_format(type_name, other)),
        },
        (PrimitiveType::Integer | PrimitiveType::Number, None) => "integer",
        (PrimitiveType::Integer | PrimitiveType::Number, Some(f)) => match f {
            "int32" => "integer",
            "int64" => "long",
            "float" => "float",
            "double" => "double",
            other => return Err(unknown_format(type_name, other)),
        },
        (PrimitiveType::Boolean, _) => "boolean",
        (PrimitiveType::Object, _) => {
            return Ok(TypeMetadata {
                name: "object".to_string(),
                additional_properties: map_value_type(reference),
            });
        }
        (PrimitiveType::Array, _) => "array",
    };

    Ok(TypeMetadata::named(name))
}

fn map_value_type(reference: &SchemaReference) -> Option<String> {
    match reference.additional_properties.as_ref()? {
        AdditionalProperties::Schema(value) => value.schema_type.clone(),
        AdditionalProperties::Bool(_) => None,
    }
}

fn unknown_format(type_name: &str, format: &str) -> ExtractError {
    ExtractError::UnknownFormat {
        type_name: type_name.to_string(),
        format: format.to_string(),
    }
}

fn pointer_segments(ref_path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = ref_path.split('/').collect();
    if segments.first() == Some(&"#") {
        segments.remove(0);
    }
    segments
}

/// Walk a local `$ref` pointer through the document and return the node it
/// points at.
pub(crate) fn lookup_ref<'a>(
    document: &'a Document,
    ref_path: &str,
) -> Result<&'a serde_json::Value, ExtractError> {
    let mut node = document.raw();
    for segment in pointer_segments(ref_path) {
        let key = unescape_segment(segment);
        let next = match node {
            serde_json::Value::Object(map) => map.get(&key),
            serde_json::Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        node = next
            .filter(|n| !n.is_null())
            .ok_or_else(|| ExtractError::UnresolvedReference(ref_path.to_string()))?;
    }
    Ok(node)
}

/// The name a `$ref` points at: its last path segment.
fn resolve_ref(document: &Document, ref_path: &str) -> Result<String, ExtractError> {
    lookup_ref(document, ref_path)?;
    match pointer_segments(ref_path).last() {
        Some(last) if !last.is_empty() => Ok(unescape_segment(last)),
        _ => Err(ExtractError::UnresolvedReference(ref_path.to_string())),
    }
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn document() -> Document {
        parse::from_json(
            r#"{
                "swagger": "2.0",
                "info": { "title": "Widgets", "version": "1" },
                "paths": {},
                "definitions": {
                    "Widget": { "type": "object", "properties": { "id": { "type": "integer" } } },
                    "a/b": { "type": "string" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ref_resolves_to_last_segment() {
        let doc = document();
        let ty = get_type(&doc, &SchemaReference::reference("#/definitions/Widget")).unwrap();
        assert_eq!(ty.name, "Widget");
    }

    #[test]
    fn test_array_of_ref() {
        let doc = document();
        let reference = SchemaReference::array(SchemaReference::reference("#/definitions/Widget"));
        let tr = get_type_reference(&doc, &reference).unwrap();
        assert_eq!(tr.type_metadata.name, "Widget");
        assert!(tr.is_array);
    }

    #[test]
    fn test_ref_without_hash_prefix() {
        let doc = document();
        let ty = get_type(&doc, &SchemaReference::reference("definitions/Widget")).unwrap();
        assert_eq!(ty.name, "Widget");
    }

    #[test]
    fn test_escaped_ref_segment() {
        let doc = document();
        let ty = get_type(&doc, &SchemaReference::reference("#/definitions/a~1b")).unwrap();
        assert_eq!(ty.name, "a/b");
    }

    #[test]
    fn test_unresolved_ref() {
        let doc = document();
        let err = get_type(&doc, &SchemaReference::reference("#/definitions/Gadget")).unwrap_err();
        assert!(matches!(err, ExtractError::UnresolvedReference(r) if r == "#/definitions/Gadget"));
    }

    #[test]
    fn test_primitive_format_mapping() {
        let cases = [
            ("integer", Some("int64"), "long"),
            ("integer", Some("int32"), "integer"),
            ("string", Some("date-time"), "datetime"),
            ("string", Some("uuid"), "uuid"),
            ("string", None, "string"),
            ("integer", None, "integer"),
            ("number", None, "integer"),
            ("number", Some("double"), "double"),
            ("boolean", None, "boolean"),
            ("array", None, "array"),
        ];
        for (ty, format, expected) in cases {
            let resolved = get_primitive_type(&SchemaReference::primitive(ty, format)).unwrap();
            assert_eq!(resolved.name, expected, "{ty} {format:?}");
        }
    }

    #[test]
    fn test_unknown_format() {
        let err = get_primitive_type(&SchemaReference::primitive("string", Some("email")))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnknownFormat { ref format, .. } if format == "email"));

        let err = get_primitive_type(&SchemaReference::primitive("string", Some("int64")))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnknownFormat { .. }));
    }

    #[test]
    fn test_unknown_primitive() {
        let err = get_primitive_type(&SchemaReference::primitive("file", None)).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownPrimitiveType(t) if t == "file"));
    }

    #[test]
    fn test_object_keeps_map_value_type() {
        let reference: SchemaReference = serde_json::from_value(serde_json::json!({
            "type": "object",
            "additionalProperties": { "type": "integer" }
        }))
        .unwrap();
        let ty = get_primitive_type(&reference).unwrap();
        assert_eq!(ty.name, "object");
        assert_eq!(ty.additional_properties.as_deref(), Some("integer"));
    }
}
