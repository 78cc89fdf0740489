use indexmap::IndexMap;

use crate::config::{LayoutConfig, SwaggenConfig};
use crate::naming::normalize_name;
use crate::resolve::{Type, TypeId, TypePool};

use super::{Module, ModuleKind, ModuleSet};

/// Partition the pool: one module per schema, enum and alias, then one
/// module per first operation tag (first-seen order). Primitives belong to
/// no module.
pub fn create_modules(pool: &TypePool, config: &SwaggenConfig) -> ModuleSet {
    let mut modules = Vec::new();

    for (id, ty) in pool.iter() {
        if matches!(ty, Type::Schema(_) | Type::Enum(_) | Type::Alias(_)) {
            modules.push(create_module(
                ty.name(),
                ModuleKind::Schema,
                vec![id],
                pool,
                &config.layout,
            ));
        }
    }

    let mut groups: IndexMap<&str, Vec<TypeId>> = IndexMap::new();
    for (id, ty) in pool.iter() {
        let Type::Operation(op) = ty else { continue };
        let tag = op
            .tags
            .first()
            .map(String::as_str)
            .unwrap_or(&config.grouping.default_tag);
        groups.entry(tag).or_default().push(id);
    }

    let schema_modules = modules.len();
    for (tag, ids) in groups {
        modules.push(create_module(
            tag,
            ModuleKind::Operation,
            ids,
            pool,
            &config.layout,
        ));
    }

    log::debug!(
        "created {} schema modules and {} operation modules",
        schema_modules,
        modules.len() - schema_modules
    );
    ModuleSet::new(modules)
}

/// Build a module over `types`, exporting each member's name. A module made
/// only of language-provided types is not emittable.
pub fn create_module(
    name: &str,
    kind: ModuleKind,
    types: Vec<TypeId>,
    pool: &TypePool,
    layout: &LayoutConfig,
) -> Module {
    let name = normalize_name(name);
    let dir = match kind {
        ModuleKind::Schema => &layout.schemas_dir,
        ModuleKind::Operation => &layout.operations_dir,
    };
    let file = name.for_file(layout.file_naming);
    let path_stem = if dir.is_empty() {
        file
    } else {
        format!("{}/{file}", dir.trim_end_matches('/'))
    };

    let exports = types
        .iter()
        .map(|&id| pool.get(id).name().to_string())
        .collect();
    let emittable = !types
        .iter()
        .all(|&id| matches!(pool.get(id), Type::Schema(s) if s.is_language_specific));

    Module::new(name, kind, types, exports, emittable, path_stem)
}
