//! Explicit subtype graph over kinds, with distance computation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Errors raised while declaring kinds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A kind with this name has already been registered.
    #[error("kind '{name}' is already registered")]
    DuplicateKind { name: String },

    /// A class kind was given where a capability kind is required.
    #[error("kind '{name}' is not a capability kind")]
    NotACapability { name: String },

    /// A capability kind was given where a class kind is required.
    #[error("kind '{name}' is not a class kind")]
    NotAClass { name: String },
}

/// Opaque tag identifying one kind in its graph.
///
/// Tags are assigned densely at registration time and are only meaningful
/// together with the graph that issued them. They are `Copy` and hashable,
/// which makes them cheap cache keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Kind(u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
enum KindRole {
    Class,
    Capability,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct KindNode {
    name: String,
    role: KindRole,
    parent: Option<Kind>,
    capabilities: Vec<Kind>,
}

/// Directed acyclic subtype graph: each kind has at most one parent class
/// and any number of implemented capabilities.
///
/// The graph is built once, before any configuration is authored, and is
/// read-only afterwards. Registration order assigns the [`Kind`] tags.
///
/// # Example
///
/// ```rust
/// use kindred::KindGraph;
///
/// # fn main() -> Result<(), kindred::GraphError> {
/// let mut graph = KindGraph::new();
/// let animal = graph.class("Animal")?;
/// let dog = graph.subclass("Dog", animal)?;
/// let pet = graph.capability("Pet")?;
/// graph.implement(dog, pet)?;
///
/// assert_eq!(graph.distance(dog, animal), Some(1));
/// assert_eq!(graph.distance(dog, pet), Some(1));
/// assert_eq!(graph.distance(animal, dog), None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KindGraph {
    nodes: Vec<KindNode>,
    by_name: HashMap<String, Kind>,
}

impl KindGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root class kind.
    pub fn class(&mut self, name: &str) -> Result<Kind, GraphError> {
        self.insert(name, KindRole::Class, None)
    }

    /// Register a class kind derived from `parent`.
    ///
    /// The parent must itself be a class kind; capability ancestry is
    /// declared through [`implement`](Self::implement) instead.
    pub fn subclass(&mut self, name: &str, parent: Kind) -> Result<Kind, GraphError> {
        if self.node(parent).role != KindRole::Class {
            return Err(GraphError::NotAClass {
                name: self.name_of(parent).to_string(),
            });
        }
        self.insert(name, KindRole::Class, Some(parent))
    }

    /// Register a capability kind (interface-like supertype).
    pub fn capability(&mut self, name: &str) -> Result<Kind, GraphError> {
        self.insert(name, KindRole::Capability, None)
    }

    /// Declare that `kind` directly implements `capability`.
    ///
    /// Works for class and capability kinds alike, mirroring classes
    /// implementing interfaces and interfaces extending interfaces.
    pub fn implement(&mut self, kind: Kind, capability: Kind) -> Result<(), GraphError> {
        if self.node(capability).role != KindRole::Capability {
            return Err(GraphError::NotACapability {
                name: self.name_of(capability).to_string(),
            });
        }
        self.nodes[kind.0 as usize].capabilities.push(capability);
        Ok(())
    }

    /// Look up a kind by its registered name.
    pub fn get(&self, name: &str) -> Option<Kind> {
        self.by_name.get(name).copied()
    }

    /// Name a kind was registered under.
    pub fn name_of(&self, kind: Kind) -> &str {
        &self.node(kind).name
    }

    /// Whether `kind` was registered as a capability.
    pub fn is_capability(&self, kind: Kind) -> bool {
        self.node(kind).role == KindRole::Capability
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no kinds have been registered yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `concrete` is `declared` itself or one of its descendants.
    pub fn is_kind_of(&self, concrete: Kind, declared: Kind) -> bool {
        self.distance(concrete, declared).is_some()
    }

    /// Specificity distance from a concrete kind to a declared reference
    /// kind: the length of the shortest specialization path, or `None` if
    /// `concrete` is not a subtype of `declared`.
    ///
    /// Parent edges are always walked. Capability edges are walked only
    /// while searching for a capability target, so a capability never
    /// shadows the class chain of a class target.
    pub fn distance(&self, concrete: Kind, declared: Kind) -> Option<u32> {
        let via_capabilities = self.is_capability(declared);
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        queue.push_back((concrete, 0u32));
        visited[concrete.0 as usize] = true;

        while let Some((kind, steps)) = queue.pop_front() {
            if kind == declared {
                return Some(steps);
            }
            let node = self.node(kind);
            let parent = node.parent.into_iter();
            let capabilities = node
                .capabilities
                .iter()
                .copied()
                .filter(|_| via_capabilities);
            for next in parent.chain(capabilities) {
                if !visited[next.0 as usize] {
                    visited[next.0 as usize] = true;
                    queue.push_back((next, steps + 1));
                }
            }
        }
        None
    }

    fn insert(
        &mut self,
        name: &str,
        role: KindRole,
        parent: Option<Kind>,
    ) -> Result<Kind, GraphError> {
        if self.by_name.contains_key(name) {
            return Err(GraphError::DuplicateKind {
                name: name.to_string(),
            });
        }
        let kind = Kind(self.nodes.len() as u32);
        self.nodes.push(KindNode {
            name: name.to_string(),
            role,
            parent,
            capabilities: Vec::new(),
        });
        self.by_name.insert(name.to_string(), kind);
        Ok(kind)
    }

    fn node(&self, kind: Kind) -> &KindNode {
        &self.nodes[kind.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(depth: u32) -> (KindGraph, Vec<Kind>) {
        let mut graph = KindGraph::new();
        let mut kinds = vec![graph.class("K0").unwrap()];
        for i in 1..=depth {
            let parent = kinds[(i - 1) as usize];
            kinds.push(graph.subclass(&format!("K{i}"), parent).unwrap());
        }
        (graph, kinds)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let (graph, kinds) = chain(3);
        for kind in kinds {
            assert_eq!(graph.distance(kind, kind), Some(0));
        }
    }

    #[test]
    fn distance_counts_parent_steps() {
        let (graph, kinds) = chain(4);
        assert_eq!(graph.distance(kinds[4], kinds[0]), Some(4));
        assert_eq!(graph.distance(kinds[3], kinds[1]), Some(2));
        assert_eq!(graph.distance(kinds[1], kinds[0]), Some(1));
    }

    #[test]
    fn distance_is_none_upwards() {
        let (graph, kinds) = chain(2);
        assert_eq!(graph.distance(kinds[0], kinds[2]), None);
        assert!(!graph.is_kind_of(kinds[0], kinds[2]));
    }

    #[test]
    fn unrelated_kinds_do_not_match() {
        let mut graph = KindGraph::new();
        let a = graph.class("A").unwrap();
        let b = graph.class("B").unwrap();
        assert_eq!(graph.distance(a, b), None);
    }

    #[test]
    fn capability_edges_only_reach_capability_targets() {
        let mut graph = KindGraph::new();
        let base = graph.class("Base").unwrap();
        let cap = graph.capability("Cap").unwrap();
        let derived = graph.subclass("Derived", base).unwrap();
        graph.implement(derived, cap).unwrap();

        assert_eq!(graph.distance(derived, cap), Some(1));
        assert_eq!(graph.distance(derived, base), Some(1));
        // Capability nodes never reach a class target.
        assert_eq!(graph.distance(cap, base), None);
    }

    #[test]
    fn capability_extending_capability_is_transitive() {
        let mut graph = KindGraph::new();
        let wide = graph.capability("Wide").unwrap();
        let narrow = graph.capability("Narrow").unwrap();
        graph.implement(narrow, wide).unwrap();
        let thing = graph.class("Thing").unwrap();
        graph.implement(thing, narrow).unwrap();

        assert_eq!(graph.distance(thing, narrow), Some(1));
        assert_eq!(graph.distance(thing, wide), Some(2));
    }

    #[test]
    fn diamond_paths_take_the_shortest() {
        // Thing implements Wide both directly and through Narrow.
        let mut graph = KindGraph::new();
        let wide = graph.capability("Wide").unwrap();
        let narrow = graph.capability("Narrow").unwrap();
        graph.implement(narrow, wide).unwrap();
        let thing = graph.class("Thing").unwrap();
        graph.implement(thing, narrow).unwrap();
        graph.implement(thing, wide).unwrap();

        assert_eq!(graph.distance(thing, wide), Some(1));
    }

    #[test]
    fn capability_reached_through_parent_chain() {
        let mut graph = KindGraph::new();
        let cap = graph.capability("Cap").unwrap();
        let base = graph.class("Base").unwrap();
        graph.implement(base, cap).unwrap();
        let leaf = graph.subclass("Leaf", base).unwrap();

        assert_eq!(graph.distance(leaf, cap), Some(2));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut graph = KindGraph::new();
        graph.class("A").unwrap();
        let err = graph.class("A").unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateKind {
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn subclass_requires_class_parent() {
        let mut graph = KindGraph::new();
        let cap = graph.capability("Cap").unwrap();
        let err = graph.subclass("Sub", cap).unwrap_err();
        assert!(matches!(err, GraphError::NotAClass { .. }));
    }

    #[test]
    fn implement_requires_capability_target() {
        let mut graph = KindGraph::new();
        let a = graph.class("A").unwrap();
        let b = graph.class("B").unwrap();
        let err = graph.implement(a, b).unwrap_err();
        assert!(matches!(err, GraphError::NotACapability { .. }));
    }

    #[test]
    fn lookup_by_name_round_trips() {
        let mut graph = KindGraph::new();
        let a = graph.class("A").unwrap();
        assert_eq!(graph.get("A"), Some(a));
        assert_eq!(graph.name_of(a), "A");
        assert_eq!(graph.get("missing"), None);
    }

    #[test]
    fn graph_serializes_round_trip() {
        let mut graph = KindGraph::new();
        let base = graph.class("Base").unwrap();
        let cap = graph.capability("Cap").unwrap();
        let leaf = graph.subclass("Leaf", base).unwrap();
        graph.implement(leaf, cap).unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let restored: KindGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.get("Leaf"), Some(leaf));
        assert_eq!(restored.distance(leaf, base), Some(1));
        assert_eq!(restored.distance(leaf, cap), Some(1));
    }
}
