//! Depth-first topological traversal with lazy node discovery.
//!
//! Nodes are found by asking `get_children` for the children of the node
//! being visited; a child seen for the first time gets a fresh visitation
//! record. Each node's callback fires exactly once, after the callbacks of
//! all its children, so a resolver running in the callback can rely on every
//! dependency already sitting in the output pool.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the current traversal stack.
    Temporary,
    /// Finalized; its callback has fired.
    Permanent,
}

#[derive(Debug)]
struct TopoNode<N> {
    mark: Mark,
    contained: N,
}

/// Traversal-local state. Nothing outlives a single `sort`/`resolve` call.
struct Visitor<N, K, C, F, V> {
    nodes: Vec<TopoNode<N>>,
    /// Identity key to position in `nodes`.
    index: HashMap<K, usize>,
    path: Vec<usize>,
    order: Vec<usize>,
    get_children: C,
    key: F,
    on_visited: V,
}

impl<N, K, C, F, V> Visitor<N, K, C, F, V>
where
    N: Display,
    K: Hash + Eq,
    C: FnMut(&N) -> Result<Vec<N>, ResolveError>,
    F: Fn(&N) -> K,
    V: FnMut(&N, bool) -> Result<(), ResolveError>,
{
    fn new(root: N, get_children: C, key: F, on_visited: V) -> Self {
        let mut index = HashMap::new();
        index.insert(key(&root), 0);
        Self {
            nodes: vec![TopoNode {
                mark: Mark::Unvisited,
                contained: root,
            }],
            index,
            path: Vec::new(),
            order: Vec::new(),
            get_children,
            key,
            on_visited,
        }
    }

    fn run(&mut self) -> Result<(), ResolveError> {
        self.visit(0)
    }

    fn visit(&mut self, index: usize) -> Result<(), ResolveError> {
        match self.nodes[index].mark {
            Mark::Temporary => return Err(self.cycle_error(index)),
            Mark::Permanent => return Ok(()),
            Mark::Unvisited => {}
        }

        self.nodes[index].mark = Mark::Temporary;
        self.path.push(index);

        let children = (self.get_children)(&self.nodes[index].contained)?;
        for child in children {
            let child_index = self.find_or_insert(child);
            self.visit(child_index)?;
        }

        self.path.pop();
        self.nodes[index].mark = Mark::Permanent;
        self.order.push(index);
        (self.on_visited)(&self.nodes[index].contained, index == 0)
    }

    fn find_or_insert(&mut self, node: N) -> usize {
        let next = self.nodes.len();
        let position = *self.index.entry((self.key)(&node)).or_insert(next);
        if position == next {
            self.nodes.push(TopoNode {
                mark: Mark::Unvisited,
                contained: node,
            });
        }
        position
    }

    /// The stack from the first occurrence of the re-entered node, closed
    /// back onto it.
    fn cycle_error(&self, index: usize) -> ResolveError {
        let start = self.path.iter().position(|&i| i == index).unwrap_or(0);
        let cycle = self.path[start..]
            .iter()
            .chain(std::iter::once(&index))
            .map(|&i| self.nodes[i].contained.to_string())
            .collect();
        ResolveError::CyclicReference { cycle }
    }
}

/// Every node reachable from `root` in post-order (leaves first, `root`
/// last), with nodes identified by value.
pub fn sort<N, C>(root: N, get_children: C) -> Result<Vec<N>, ResolveError>
where
    N: Display + Clone + Hash + Eq,
    C: FnMut(&N) -> Result<Vec<N>, ResolveError>,
{
    sort_by_key(root, get_children, N::clone)
}

/// Like [`sort`], with two nodes treated as the same node when `key`
/// maps them to equal values.
pub fn sort_by_key<N, K, C, F>(root: N, get_children: C, key: F) -> Result<Vec<N>, ResolveError>
where
    N: Display + Clone,
    K: Hash + Eq,
    C: FnMut(&N) -> Result<Vec<N>, ResolveError>,
    F: Fn(&N) -> K,
{
    let mut visitor = Visitor::new(root, get_children, key, |_: &N, _| Ok(()));
    visitor.run()?;
    Ok(visitor
        .order
        .iter()
        .map(|&i| visitor.nodes[i].contained.clone())
        .collect())
}

/// Resolve every node reachable from `root` (the root itself excluded) in
/// dependency order. `resolve_fn` receives the node and everything resolved
/// so far; its result is appended to that pool.
pub fn resolve<N, T, C, R>(root: N, get_children: C, resolve_fn: R) -> Result<Vec<T>, ResolveError>
where
    N: Display + Clone + Hash + Eq,
    C: FnMut(&N) -> Result<Vec<N>, ResolveError>,
    R: FnMut(&N, &[T]) -> Result<T, ResolveError>,
{
    resolve_by_key(root, get_children, resolve_fn, N::clone)
}

/// Like [`resolve`], with node identity decided by `key`.
pub fn resolve_by_key<N, K, T, C, R, F>(
    root: N,
    get_children: C,
    mut resolve_fn: R,
    key: F,
) -> Result<Vec<T>, ResolveError>
where
    N: Display,
    K: Hash + Eq,
    C: FnMut(&N) -> Result<Vec<N>, ResolveError>,
    R: FnMut(&N, &[T]) -> Result<T, ResolveError>,
    F: Fn(&N) -> K,
{
    let mut pool: Vec<T> = Vec::new();
    {
        let on_visited = |node: &N, is_root: bool| -> Result<(), ResolveError> {
            if !is_root {
                let resolved = resolve_fn(node, &pool)?;
                pool.push(resolved);
            }
            Ok(())
        };
        Visitor::new(root, get_children, key, on_visited).run()?;
    }
    Ok(pool)
}
