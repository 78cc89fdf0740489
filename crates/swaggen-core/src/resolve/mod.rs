//! Dependency-ordered type resolution: a generic topological walk plus the
//! type model it builds.

pub mod pool;
pub mod topo;
pub mod types;

pub use pool::{TypePool, get_type_pool};
pub use types::*;
