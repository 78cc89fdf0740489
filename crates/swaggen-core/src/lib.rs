pub mod config;
pub mod error;
pub mod extract;
pub mod module;
pub mod naming;
pub mod parse;
pub mod pipeline;
pub mod resolve;

pub use pipeline::{GenerationPlan, generate};

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Renders one module of a [`GenerationPlan`] into target-language source.
/// Returning `None` (or empty text) skips the module.
pub trait ModuleEmitter {
    type Error: std::error::Error;
    fn emit_module(
        &self,
        module: &module::Module,
        dependencies: &[module::DependencyRecord],
        pool: &resolve::TypePool,
    ) -> Result<Option<String>, Self::Error>;
}
