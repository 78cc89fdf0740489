use std::fmt;

use indexmap::IndexMap;

use crate::config::SwaggenConfig;
use crate::error::GenerateError;
use crate::extract;
use crate::module::dependencies::records_for;
use crate::module::{
    DependencyRecord, Module, ModuleId, ModuleSet, create_modules, resolve_module_dependencies,
};
use crate::parse::document::Document;
use crate::resolve::{TypeId, TypePool, get_type_pool};
use crate::{GeneratedFile, ModuleEmitter};

/// Everything an emitter needs: the resolved pool, its module partition and
/// each module's cross-module dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pool: TypePool,
    modules: ModuleSet,
    /// Indexed by module id.
    dependencies: Vec<IndexMap<ModuleId, Vec<TypeId>>>,
}

/// Run the whole pipeline over a parsed document. Any error aborts the run;
/// nothing partial is returned.
pub fn generate(
    document: &Document,
    config: &SwaggenConfig,
) -> Result<GenerationPlan, GenerateError> {
    // Phase 1: Extract language-independent metadata
    let entities = extract::get_entities(document)?;

    // Phase 2: Resolve types in dependency order
    let pool = get_type_pool(&entities)?;

    // Phase 3: Partition the pool into modules
    let modules = create_modules(&pool, config);

    // Phase 4: Cross-module dependencies, once per module
    let dependencies = modules
        .iter()
        .map(|(id, _)| resolve_module_dependencies(id, &modules, &pool))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "planned {} modules over {} types",
        modules.len(),
        pool.len()
    );

    Ok(GenerationPlan {
        pool,
        modules,
        dependencies,
    })
}

impl GenerationPlan {
    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    pub fn module_dependencies(&self, id: ModuleId) -> &IndexMap<ModuleId, Vec<TypeId>> {
        &self.dependencies[id.index()]
    }

    /// Import records for a module, rebuilt on each call.
    pub fn dependency_records(&self, id: ModuleId) -> Vec<DependencyRecord> {
        records_for(id, self.module_dependencies(id), &self.modules, &self.pool)
    }

    pub fn emittable_modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().filter(|(_, m)| m.emittable)
    }

    /// Run `emitter` over every emittable module. Modules that render to
    /// nothing produce no file.
    pub fn emit<E: ModuleEmitter>(
        &self,
        emitter: &E,
        extension: &str,
    ) -> Result<Vec<GeneratedFile>, E::Error> {
        let mut files = Vec::new();
        for (id, module) in self.emittable_modules() {
            let records = self.dependency_records(id);
            match emitter.emit_module(module, &records, &self.pool)? {
                Some(content) if !content.is_empty() => files.push(GeneratedFile {
                    path: module.get_path(extension),
                    content,
                }),
                _ => log::debug!("{} rendered empty, skipped", module.name),
            }
        }
        Ok(files)
    }

    /// Human-readable listing of pool order, modules and imports.
    pub fn summary<'a>(&'a self, extension: &'a str) -> PlanSummary<'a> {
        PlanSummary {
            plan: self,
            extension,
        }
    }
}

pub struct PlanSummary<'a> {
    plan: &'a GenerationPlan,
    extension: &'a str,
}

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = &self.plan.pool;

        writeln!(f, "types:")?;
        for (id, ty) in pool.iter() {
            write!(f, "  #{} {} {}", id.index(), ty.kind(), ty.name())?;
            let deps: Vec<&str> = pool
                .dependencies(id)
                .into_iter()
                .map(|d| pool.get(d).name())
                .collect();
            if !deps.is_empty() {
                write!(f, " -> {}", deps.join(", "))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "modules:")?;
        for (id, module) in self.plan.modules.iter() {
            write!(
                f,
                "  {} [{}] exports {}",
                module.get_path(self.extension),
                module.kind.as_str(),
                module.exports.join(", ")
            )?;
            if !module.emittable {
                write!(f, " (not emitted)")?;
            }
            writeln!(f)?;
            for record in self.plan.dependency_records(id) {
                writeln!(
                    f,
                    "    import {} from {}",
                    record.exported_name,
                    record.relative_path(self.extension, false)
                )?;
            }
        }
        Ok(())
    }
}
