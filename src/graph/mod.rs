//! Entity graph module.
//!
//! Implements the directed graph connecting configuration entities, built
//! on `petgraph`.
//!
//! # Node and Edge Model
//!
//! Nodes are [`Entity`](crate::types::Entity) values, one per declared
//! block, indexed by canonical id through a `HashMap<String, NodeIndex>`
//! for O(1) lookup. Edges carry a [`RelationshipKind`]:
//!
//! 1. **Reference**: one entity's attributes mention another entity's id
//! 2. **ModuleInput**: a module call wires a variable into the module
//! 3. **ModuleOutput**: an output exposes a value a module produced
//! 4. **Implicit**: derived resource/data → provider association
//!
//! # Data Flow
//!
//! ```text
//! per-document entities ──▶ GraphAssembler ──▶ Graph ──▶ export_graph
//! ```
//!
//! The assembler merges entities (first id occurrence wins), resolves
//! references against the corpus-wide namespace, classifies edge kinds,
//! and stamps summary metadata. The resulting graph is immutable output;
//! every parse invocation rebuilds it from scratch.

mod builder;
mod export;
mod types;

pub use builder::{DocumentEntities, GraphAssembler};
pub use export::export_graph;
pub(crate) use export::{wire_graph, WireGraph};
pub use types::{Graph, GraphMetadata, Relationship, RelationshipKind};
