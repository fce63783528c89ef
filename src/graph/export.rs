//! Graph export functionality.
//!
//! This module serializes an assembled graph for downstream consumers:
//! the JSON wire shape for programmatic use, plus DOT and Mermaid for
//! visualization.

use crate::error::Result;
use crate::graph::types::{Graph, Relationship, RelationshipKind};
use crate::types::{AttrMap, Category, GraphFormat};
use serde::Serialize;

/// Export the graph to the specified format.
///
/// # Supported Formats
///
/// - **JSON**: the canonical wire shape (entities, relationships, metadata)
/// - **DOT**: Graphviz DOT for visualization
/// - **Mermaid**: Mermaid diagram syntax for documentation
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_graph(graph: &Graph, format: GraphFormat) -> Result<String> {
    match format {
        GraphFormat::Json => export_json(graph),
        GraphFormat::Dot => export_dot(graph),
        GraphFormat::Mermaid => export_mermaid(graph),
    }
}

/// The canonical JSON wire shape.
#[derive(Serialize)]
pub(crate) struct WireGraph<'a> {
    entities: Vec<WireEntity<'a>>,
    relationships: Vec<Relationship>,
    metadata: crate::graph::types::GraphMetadata,
}

#[derive(Serialize)]
struct WireEntity<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    entity_type: &'a str,
    category: Category,
    name: &'a str,
    provider: Option<&'a str>,
    attributes: &'a AttrMap,
    dependencies: &'a [String],
}

/// Build the serializable wire representation of a graph.
///
/// Entities appear in discovery order, relationships in assembly order, so
/// equal corpora always produce byte-identical output.
pub(crate) fn wire_graph(graph: &Graph) -> WireGraph<'_> {
    let entities = graph
        .entities()
        .map(|e| WireEntity {
            id: &e.id,
            // Untyped kinds repeat the category keyword as their type
            entity_type: if e.block_type.is_empty() {
                e.category.as_str()
            } else {
                &e.block_type
            },
            category: e.category,
            name: &e.name,
            provider: e.provider.as_deref(),
            attributes: &e.attributes,
            dependencies: &e.dependencies,
        })
        .collect();

    WireGraph {
        entities,
        relationships: graph.relationship_triples(),
        metadata: graph.metadata(),
    }
}

/// Export to the canonical JSON wire shape.
fn export_json(graph: &Graph) -> Result<String> {
    serde_json::to_string_pretty(&wire_graph(graph)).map_err(|e| {
        crate::err!(ReportGeneration {
            message: format!("Failed to serialize graph to JSON: {e}"),
        })
    })
}

/// Export to Graphviz DOT format.
fn export_dot(graph: &Graph) -> Result<String> {
    let mut dot = String::new();
    dot.push_str("digraph TerraLens {\n");
    dot.push_str("    rankdir=TB;\n");
    dot.push_str("    node [shape=box, style=\"rounded,filled\"];\n\n");

    for entity in graph.entities() {
        let node_id = escape_dot_id(&entity.id);
        let label = escape_dot_string(&format!("{}\\n{}", entity.name, entity.category));
        let color = category_color(entity.category);
        dot.push_str(&format!(
            "    \"{node_id}\" [label=\"{label}\", fillcolor={color}];\n"
        ));
    }
    dot.push('\n');

    for (from, to, kind) in graph.relationships() {
        let from_id = escape_dot_id(&from.id);
        let to_id = escape_dot_id(&to.id);
        let style = match kind {
            RelationshipKind::Reference => "style=solid, color=black",
            RelationshipKind::ModuleInput => "style=solid, color=blue",
            RelationshipKind::ModuleOutput => "style=solid, color=orange",
            RelationshipKind::Implicit => "style=dashed, color=gray",
        };
        dot.push_str(&format!(
            "    \"{from_id}\" -> \"{to_id}\" [{style}, label=\"{kind}\"];\n"
        ));
    }

    dot.push_str("}\n");
    Ok(dot)
}

/// Export to Mermaid diagram format.
fn export_mermaid(graph: &Graph) -> Result<String> {
    let mut mermaid = String::new();
    mermaid.push_str("graph TD\n");

    for entity in graph.entities() {
        let id = sanitize_mermaid_id(&entity.id);
        let label = escape_mermaid_string(&entity.id);
        match entity.category {
            Category::Provider => mermaid.push_str(&format!("    {id}((\"{label}\"))\n")),
            Category::Variable | Category::Output => {
                mermaid.push_str(&format!("    {id}>\"{label}\"]\n"));
            }
            _ => mermaid.push_str(&format!("    {id}[\"{label}\"]\n")),
        }
    }

    mermaid.push('\n');

    for (from, to, kind) in graph.relationships() {
        let from_id = sanitize_mermaid_id(&from.id);
        let to_id = sanitize_mermaid_id(&to.id);
        let arrow = match kind {
            RelationshipKind::Reference => "-->",
            RelationshipKind::ModuleInput => "==>",
            RelationshipKind::ModuleOutput => "-->",
            RelationshipKind::Implicit => "-.->",
        };
        mermaid.push_str(&format!("    {from_id} {arrow} {to_id}\n"));
    }

    Ok(mermaid)
}

/// DOT fill color per entity category.
const fn category_color(category: Category) -> &'static str {
    match category {
        Category::Resource => "lightblue",
        Category::Data => "lightyellow",
        Category::Module => "lightsalmon",
        Category::Variable => "lightgray",
        Category::Output => "lightgreen",
        Category::Provider => "plum",
    }
}

/// Escape a string for use in DOT labels.
fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape a string for use as a DOT node ID.
fn escape_dot_id(s: &str) -> String {
    s.replace(['.', '-', '/', ':'], "_")
}

/// Sanitize a string for use as a Mermaid node ID.
fn sanitize_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escape a string for use in Mermaid labels.
fn escape_mermaid_string(s: &str) -> String {
    s.replace('"', "'").replace('\n', " ")
}
