//! Language-independent metadata extraction: walks a parsed document's
//! schema table and paths and resolves every type reference to a canonical
//! name.

pub mod metadata;
pub mod operations;
pub mod reference;
pub mod schemas;

pub use metadata::*;
pub use operations::get_operations;
pub use reference::{VOID, get_primitive_type, get_type, get_type_reference, is_primitive_name};
pub use schemas::get_schemas;

use crate::error::ExtractError;
use crate::parse::document::Document;

/// Schemas followed by operations, the order the type pool is seeded in.
pub fn get_entities(document: &Document) -> Result<Vec<EntityMetadata>, ExtractError> {
    let schemas = get_schemas(document)?;
    let operations = get_operations(document)?;
    log::debug!(
        "extracted {} schemas and {} operations",
        schemas.len(),
        operations.len()
    );

    Ok(schemas
        .into_iter()
        .map(EntityMetadata::Schema)
        .chain(operations.into_iter().map(EntityMetadata::Operation))
        .collect())
}
