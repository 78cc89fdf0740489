use std::collections::HashMap;
use std::fmt;

use crate::error::ResolveError;
use crate::extract::{EntityKind, EntityMetadata, PlaceholderMetadata, is_primitive_name};

use super::topo;
use super::types::{TargetIndex, Type, TypeId, TypeKind, create_type, get_resolver};

/// Every resolved type of one run, in dependency order: a type's
/// dependencies always sit at lower ids than the type itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePool {
    types: Vec<Type>,
    index: HashMap<(TypeKind, String), TypeId>,
}

impl TypePool {
    fn new(types: Vec<Type>) -> Self {
        let mut index = HashMap::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            index
                .entry((ty.kind(), ty.name().to_string()))
                .or_insert(TypeId(i));
        }
        Self { types, index }
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0]
    }

    pub fn find(&self, name: &str, kind: TypeKind) -> Option<TypeId> {
        self.index.get(&(kind, name.to_string())).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    /// Direct dependencies of a type, first occurrence order, no repeats.
    pub fn dependencies(&self, id: TypeId) -> Vec<TypeId> {
        let mut deps = self.get(id).dependencies();
        let mut seen = Vec::with_capacity(deps.len());
        deps.retain(|d| {
            if seen.contains(d) {
                false
            } else {
                seen.push(*d);
                true
            }
        });
        deps
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Traversal node: the synthetic root or an entity addressed by kind and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Root,
    Entity(EntityKind, String),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Root => f.write_str("<root>"),
            Node::Entity(_, name) => f.write_str(name),
        }
    }
}

/// Resolve extracted entities into a [`TypePool`]. Names referenced but never
/// declared resolve to placeholder primitives. Two entities of the same kind
/// and name are rejected.
pub fn get_type_pool(entities: &[EntityMetadata]) -> Result<TypePool, ResolveError> {
    let mut index: HashMap<(EntityKind, &str), &EntityMetadata> = HashMap::new();
    for entity in entities {
        if index.insert((entity.kind(), entity.name()), entity).is_some() {
            return Err(ResolveError::DuplicateEntity {
                kind: entity.kind(),
                name: entity.name().to_string(),
            });
        }
    }
    let mut targets = TargetIndex::default();

    let get_children = |node: &Node| -> Result<Vec<Node>, ResolveError> {
        match node {
            Node::Root => Ok(entities
                .iter()
                .map(|e| Node::Entity(e.kind(), e.name().to_string()))
                .collect()),
            Node::Entity(kind, name) => Ok(index
                .get(&(*kind, name.as_str()))
                .map(|e| e.dependency_names())
                .unwrap_or_default()
                .into_iter()
                .map(|dep| Node::Entity(EntityKind::Schema, dep))
                .collect()),
        }
    };

    let resolve_fn = |node: &Node, pool: &[Type]| -> Result<Type, ResolveError> {
        let Node::Entity(kind, name) = node else {
            return Err(ResolveError::UnresolvedType(node.to_string()));
        };
        let ty = match index.get(&(*kind, name.as_str())) {
            Some(entity) => create_type(entity, get_resolver(&targets))?,
            None => {
                if is_primitive_name(name) {
                    log::trace!("{name} resolved as a primitive leaf");
                } else {
                    log::warn!("{name} is referenced but never declared; using a placeholder");
                }
                let placeholder = EntityMetadata::Placeholder(PlaceholderMetadata {
                    name: name.clone(),
                });
                create_type(&placeholder, get_resolver(&targets))?
            }
        };
        let id = TypeId(pool.len());
        targets.insert(id, &ty);
        log::trace!("resolved {} {} as #{}", ty.kind(), ty.name(), id.0);
        Ok(ty)
    };

    let types = topo::resolve(Node::Root, get_children, resolve_fn)?;
    log::debug!("type pool holds {} types", types.len());
    Ok(TypePool::new(types))
}
