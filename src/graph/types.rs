//! Graph type definitions.
//!
//! This module defines the assembled graph model:
//! - `Graph`: the entity graph (petgraph-backed, insertion-ordered)
//! - `RelationshipKind`: the kinds of directed edges
//! - `Relationship`: a flattened `(source, target, kind)` triple
//! - `GraphMetadata`: summary counts

use crate::types::Entity;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;

/// Kind of a directed relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// One entity's attributes reference another entity's id
    Reference,
    /// A module passes a variable-valued attribute as input
    ModuleInput,
    /// An output exposes a value produced by a module
    ModuleOutput,
    /// Derived association with no written reference (resource → provider)
    Implicit,
}

impl RelationshipKind {
    /// Wire-format name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::ModuleInput => "module_input",
            Self::ModuleOutput => "module_output",
            Self::Implicit => "implicit",
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between two entities, flattened for serialization.
///
/// Edges are derived data: recomputed on every parse, never mutated after
/// assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// Source entity id
    pub source: String,
    /// Target entity id
    pub target: String,
    /// Edge kind
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

/// Summary counts for an assembled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphMetadata {
    /// Documents parsed successfully (structural failures excluded)
    pub total_files: usize,
    /// Entities in the graph
    pub total_entities: usize,
    /// Relationships in the graph
    pub total_relationships: usize,
}

/// The assembled entity graph for one corpus.
///
/// Wraps a petgraph directed graph plus an id index for fast lookup.
/// Entities iterate in insertion (discovery) order; duplicate ids are
/// rejected at insertion so the first occurrence always wins.
///
/// The graph is immutable output once assembly finishes; it is rebuilt from
/// scratch on every parse invocation.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// The underlying petgraph directed graph
    inner: DiGraph<Entity, RelationshipKind>,

    /// Index from entity id to petgraph NodeIndex
    node_index: HashMap<String, NodeIndex>,

    /// Documents that parsed successfully into this graph
    total_files: usize,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how many documents parsed successfully.
    pub fn set_total_files(&mut self, count: usize) {
        self.total_files = count;
    }

    /// Documents that parsed successfully.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Add an entity to the graph.
    ///
    /// Returns `false` (and leaves the graph unchanged) if an entity with
    /// the same id already exists.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if self.node_index.contains_key(&entity.id) {
            return false;
        }

        let id = entity.id.clone();
        let idx = self.inner.add_node(entity);
        self.node_index.insert(id, idx);
        true
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.node_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Replace an entity's resolved dependency list.
    pub fn set_dependencies(&mut self, id: &str, dependencies: Vec<String>) {
        if let Some(&idx) = self.node_index.get(id) {
            if let Some(entity) = self.inner.node_weight_mut(idx) {
                entity.dependencies = dependencies;
            }
        }
    }

    /// Add a directed edge between two entities.
    ///
    /// Returns `false` if either endpoint is missing, the edge would be a
    /// self-loop, or an identical `(source, target, kind)` triple already
    /// exists.
    pub fn add_relationship(&mut self, source: &str, target: &str, kind: RelationshipKind) -> bool {
        if source == target {
            return false;
        }

        let (from_idx, to_idx) = match (self.node_index.get(source), self.node_index.get(target)) {
            (Some(&f), Some(&t)) => (f, t),
            _ => return false,
        };

        // Parallel edges of different kinds are allowed; exact triples are not.
        if self
            .inner
            .edges_connecting(from_idx, to_idx)
            .any(|e| *e.weight() == kind)
        {
            return false;
        }

        self.inner.add_edge(from_idx, to_idx, kind);
        true
    }

    /// Iterate entities in discovery order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.inner.node_weights()
    }

    /// Iterate edges in insertion order as `(source, target, kind)`.
    pub fn relationships(&self) -> impl Iterator<Item = (&Entity, &Entity, RelationshipKind)> {
        self.inner.edge_references().map(|edge| {
            (
                &self.inner[edge.source()],
                &self.inner[edge.target()],
                *edge.weight(),
            )
        })
    }

    /// Flattened, serializable edge triples.
    #[must_use]
    pub fn relationship_triples(&self) -> Vec<Relationship> {
        self.relationships()
            .map(|(source, target, kind)| Relationship {
                source: source.id.clone(),
                target: target.id.clone(),
                kind,
            })
            .collect()
    }

    /// Number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of relationships.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Whether the graph has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Summary counts.
    #[must_use]
    pub fn metadata(&self) -> GraphMetadata {
        GraphMetadata {
            total_files: self.total_files,
            total_entities: self.entity_count(),
            total_relationships: self.relationship_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrMap, Category};
    use std::path::PathBuf;

    fn entity(id: &str, category: Category) -> Entity {
        Entity {
            id: id.to_string(),
            category,
            block_type: String::new(),
            name: id.rsplit('.').next().unwrap_or_default().to_string(),
            provider: None,
            attributes: AttrMap::new(),
            source_path: PathBuf::from("main.tf"),
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn test_first_seen_wins() {
        let mut graph = Graph::new();
        let mut first = entity("variable.env", Category::Variable);
        first.source_path = PathBuf::from("a.tf");
        let mut second = entity("variable.env", Category::Variable);
        second.source_path = PathBuf::from("b.tf");

        assert!(graph.add_entity(first));
        assert!(!graph.add_entity(second));

        assert_eq!(graph.entity_count(), 1);
        assert_eq!(
            graph.get("variable.env").unwrap().source_path,
            PathBuf::from("a.tf")
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut graph = Graph::new();
        graph.add_entity(entity("module.b", Category::Module));
        graph.add_entity(entity("module.a", Category::Module));

        let ids: Vec<&str> = graph.entities().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["module.b", "module.a"]);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = Graph::new();
        graph.add_entity(entity("module.a", Category::Module));

        assert!(!graph.add_relationship("module.a", "module.a", RelationshipKind::Reference));
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_duplicate_triple_rejected_but_kinds_coexist() {
        let mut graph = Graph::new();
        graph.add_entity(entity("module.a", Category::Module));
        graph.add_entity(entity("variable.x", Category::Variable));

        assert!(graph.add_relationship("module.a", "variable.x", RelationshipKind::Reference));
        assert!(!graph.add_relationship("module.a", "variable.x", RelationshipKind::Reference));
        assert!(graph.add_relationship(
            "module.a",
            "variable.x",
            RelationshipKind::ModuleInput
        ));

        assert_eq!(graph.relationship_count(), 2);
    }

    #[test]
    fn test_edge_to_missing_entity_rejected() {
        let mut graph = Graph::new();
        graph.add_entity(entity("module.a", Category::Module));

        assert!(!graph.add_relationship("module.a", "module.ghost", RelationshipKind::Reference));
    }

    #[test]
    fn test_metadata_counts() {
        let mut graph = Graph::new();
        graph.add_entity(entity("module.a", Category::Module));
        graph.add_entity(entity("variable.x", Category::Variable));
        graph.add_relationship("module.a", "variable.x", RelationshipKind::ModuleInput);
        graph.set_total_files(3);

        let meta = graph.metadata();
        assert_eq!(meta.total_files, 3);
        assert_eq!(meta.total_entities, 2);
        assert_eq!(meta.total_relationships, 1);
    }
}
