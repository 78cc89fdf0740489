//! Emission units: the partition of a type pool into modules, and the
//! cross-module dependency edges between them.

pub mod dependencies;
pub mod grouper;
pub mod path;

pub use dependencies::{DependencyRecord, dependency_records, resolve_module_dependencies};
pub use grouper::create_modules;

use std::collections::HashMap;

use crate::naming::NormalizedName;
use crate::resolve::TypeId;

/// Handle to a module in a [`ModuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// One schema, enum or alias.
    Schema,
    /// Every operation sharing a first tag.
    Operation,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Schema => "schema",
            ModuleKind::Operation => "operation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: NormalizedName,
    pub kind: ModuleKind,
    /// Member types; non-owning links into the pool.
    pub types: Vec<TypeId>,
    /// Names other modules can import from this one.
    pub exports: Vec<String>,
    /// `false` for modules the target language already provides.
    pub emittable: bool,
    path_stem: String,
}

impl Module {
    pub fn new(
        name: NormalizedName,
        kind: ModuleKind,
        types: Vec<TypeId>,
        exports: Vec<String>,
        emittable: bool,
        path_stem: impl Into<String>,
    ) -> Self {
        Self {
            name,
            kind,
            types,
            exports,
            emittable,
            path_stem: path_stem.into(),
        }
    }

    /// File path relative to the output root, e.g. `schemas/Person.ts`.
    pub fn get_path(&self, extension: &str) -> String {
        format!("{}{extension}", self.path_stem)
    }

    pub fn path_stem(&self) -> &str {
        &self.path_stem
    }

    pub fn owns(&self, id: TypeId) -> bool {
        self.types.contains(&id)
    }
}

/// Modules in creation order plus the type-to-module index.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSet {
    modules: Vec<Module>,
    owners: HashMap<TypeId, ModuleId>,
}

impl ModuleSet {
    /// Build the owner index. A type listed by several modules belongs to
    /// the first.
    pub fn new(modules: Vec<Module>) -> Self {
        let mut owners = HashMap::new();
        for (i, module) in modules.iter().enumerate() {
            for &type_id in &module.types {
                owners.entry(type_id).or_insert(ModuleId(i));
            }
        }
        Self { modules, owners }
    }

    pub fn get(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, m)| (ModuleId(i), m))
    }

    pub fn owner_of(&self, type_id: TypeId) -> Option<ModuleId> {
        self.owners.get(&type_id).copied()
    }

    pub fn find(&self, name: &str, kind: ModuleKind) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|m| m.kind == kind && m.name.original == name)
            .map(ModuleId)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
