use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::GroupError;
use crate::resolve::{TypeId, TypeKind, TypePool};

use super::path::relative_path;
use super::{ModuleId, ModuleSet};

/// Types a module needs from other modules, keyed by owning module in
/// first-reference order. Primitives and the module's own members are not
/// dependencies; each external type appears once.
pub fn resolve_module_dependencies(
    module_id: ModuleId,
    modules: &ModuleSet,
    pool: &TypePool,
) -> Result<IndexMap<ModuleId, Vec<TypeId>>, GroupError> {
    let module = modules.get(module_id);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut dependencies: IndexMap<ModuleId, Vec<TypeId>> = IndexMap::new();

    for &member in &module.types {
        for dep in pool.dependencies(member) {
            let ty = pool.get(dep);
            if ty.is_primitive() || module.owns(dep) || !seen.insert(ty.name()) {
                continue;
            }
            let owner = modules
                .owner_of(dep)
                .ok_or_else(|| GroupError::DependencyNotFound {
                    type_name: ty.name().to_string(),
                    module: module.name.original.clone(),
                })?;
            dependencies.entry(owner).or_default().push(dep);
        }
    }

    Ok(dependencies)
}

/// One imported name, with enough context to render an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub exported_name: String,
    pub module_name: String,
    pub type_id: TypeId,
    pub kind: TypeKind,
    importer_stem: String,
    exporter_stem: String,
}

impl DependencyRecord {
    /// Path from the importing module's file to the exporting module's file.
    /// The exporter's extension is dropped unless `keep_extension` is set.
    pub fn relative_path(&self, extension: &str, keep_extension: bool) -> String {
        let target = if keep_extension {
            format!("{}{extension}", self.exporter_stem)
        } else {
            self.exporter_stem.clone()
        };
        relative_path(&format!("{}{extension}", self.importer_stem), &target)
    }
}

/// Flattened [`resolve_module_dependencies`] output.
pub fn dependency_records(
    module_id: ModuleId,
    modules: &ModuleSet,
    pool: &TypePool,
) -> Result<Vec<DependencyRecord>, GroupError> {
    let dependencies = resolve_module_dependencies(module_id, modules, pool)?;
    Ok(records_for(module_id, &dependencies, modules, pool))
}

/// Records for an already resolved dependency map.
pub(crate) fn records_for(
    module_id: ModuleId,
    dependencies: &IndexMap<ModuleId, Vec<TypeId>>,
    modules: &ModuleSet,
    pool: &TypePool,
) -> Vec<DependencyRecord> {
    let importer = modules.get(module_id);

    dependencies
        .iter()
        .flat_map(|(&owner, types)| {
            let exporter = modules.get(owner);
            types.iter().map(move |&type_id| {
                let ty = pool.get(type_id);
                DependencyRecord {
                    exported_name: ty.name().to_string(),
                    module_name: exporter.name.original.clone(),
                    type_id,
                    kind: ty.kind(),
                    importer_stem: importer.path_stem().to_string(),
                    exporter_stem: exporter.path_stem().to_string(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwaggenConfig;
    use crate::extract;
    use crate::module::{Module, ModuleKind, create_modules};
    use crate::naming::normalize_name;
    use crate::parse;
    use crate::resolve::get_type_pool;

    fn pool_for(json: &str) -> TypePool {
        let document = parse::from_json(json).unwrap();
        get_type_pool(&extract::get_entities(&document).unwrap()).unwrap()
    }

    const ORDERS: &str = r##"{
        "swagger": "2.0",
        "paths": {
            "/orders/{id}": {
                "get": {
                    "operationId": "getOrder",
                    "tags": ["Orders"],
                    "parameters": [{ "name": "id", "in": "path", "required": true, "type": "string" }],
                    "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Order" } } }
                }
            }
        },
        "definitions": {
            "Customer": { "type": "object", "properties": { "name": { "type": "string" } } },
            "Order": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "buyer": { "$ref": "#/definitions/Customer" },
                    "payer": { "$ref": "#/definitions/Customer" }
                }
            },
            "Orders": { "type": "array", "items": { "$ref": "#/definitions/Order" } }
        }
    }"##;

    #[test]
    fn test_schema_dependency_deduplicated() {
        let pool = pool_for(ORDERS);
        let modules = create_modules(&pool, &SwaggenConfig::default());
        let order = modules.find("Order", ModuleKind::Schema).unwrap();
        let customer = modules.find("Customer", ModuleKind::Schema).unwrap();
        let customer_type = pool.find("Customer", TypeKind::Schema).unwrap();

        let deps = resolve_module_dependencies(order, &modules, &pool).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[&customer], vec![customer_type]);
    }

    #[test]
    fn test_leaf_module_has_no_dependencies() {
        let pool = pool_for(ORDERS);
        let modules = create_modules(&pool, &SwaggenConfig::default());
        let customer = modules.find("Customer", ModuleKind::Schema).unwrap();
        assert!(resolve_module_dependencies(customer, &modules, &pool).unwrap().is_empty());
    }

    #[test]
    fn test_alias_module_depends_on_target() {
        let pool = pool_for(ORDERS);
        let modules = create_modules(&pool, &SwaggenConfig::default());
        let alias = modules.find("Orders", ModuleKind::Schema).unwrap();

        let records = dependency_records(alias, &modules, &pool).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exported_name, "Order");
        assert_eq!(records[0].kind, TypeKind::Schema);
        assert_eq!(records[0].relative_path(".ts", false), "./Order");
    }

    #[test]
    fn test_operation_module_imports_across_directories() {
        let pool = pool_for(ORDERS);
        let modules = create_modules(&pool, &SwaggenConfig::default());
        let ops = modules.find("Orders", ModuleKind::Operation).unwrap();

        let records = dependency_records(ops, &modules, &pool).unwrap();
        let imported: Vec<_> = records
            .iter()
            .map(|r| (r.exported_name.as_str(), r.module_name.as_str()))
            .collect();
        assert_eq!(imported, vec![("Order", "Order")]);
        assert_eq!(records[0].relative_path(".ts", false), "../schemas/Order");
        assert_eq!(records[0].relative_path(".js", true), "../schemas/Order.js");
    }

    #[test]
    fn test_dependency_without_owner() {
        let pool = pool_for(ORDERS);
        let order_type = pool.find("Order", TypeKind::Schema).unwrap();
        let modules = ModuleSet::new(vec![Module::new(
            normalize_name("Order"),
            ModuleKind::Schema,
            vec![order_type],
            vec!["Order".to_string()],
            true,
            "schemas/Order",
        )]);
        let order = modules.find("Order", ModuleKind::Schema).unwrap();

        let err = resolve_module_dependencies(order, &modules, &pool).unwrap_err();
        assert!(matches!(
            err,
            GroupError::DependencyNotFound { ref type_name, ref module }
                if type_name == "Customer" && module == "Order"
        ));
    }
}
