//! Graph assembly.
//!
//! The `GraphAssembler` merges per-document entities into one graph,
//! resolves cross-entity references against the corpus-wide namespace, and
//! computes summary metadata.
//!
//! # Algorithm
//!
//! 1. **Entity Merge Phase**:
//!    - Concatenate all documents' entities in discovery order
//!    - First occurrence of an id wins; later collisions are reported as
//!      duplicate warnings
//!
//! 2. **Resolution Phase**:
//!    - Build the entity-id namespace from the merged graph
//!    - Resolve every entity's attribute references against it
//!    - Classify edge kinds and add deduplicated edges
//!    - Derive implicit resource → provider edges from type prefixes

use crate::graph::types::{Graph, RelationshipKind};
use crate::resolve::{EntityNamespace, ReferenceResolver};
use crate::types::{Category, Entity, ParseResult, ParseWarning};
use std::path::PathBuf;

/// Entities extracted from one successfully parsed document.
#[derive(Debug, Clone)]
pub struct DocumentEntities {
    /// The document's path
    pub path: PathBuf,
    /// Entities declared in it, in declaration order
    pub entities: Vec<Entity>,
}

/// Assembles per-document entities into a single graph.
#[derive(Debug, Clone, Default)]
pub struct GraphAssembler {
    resolver: ReferenceResolver,
}

impl GraphAssembler {
    /// Create a new assembler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: ReferenceResolver::new(),
        }
    }

    /// Merge documents into one graph and resolve all references.
    ///
    /// `warnings` carries any structural failures accumulated upstream;
    /// duplicate-id warnings are appended to it.
    #[must_use]
    pub fn assemble(
        &self,
        documents: Vec<DocumentEntities>,
        mut warnings: Vec<ParseWarning>,
    ) -> ParseResult {
        let mut graph = Graph::new();
        graph.set_total_files(documents.len());

        // Phase 1: merge entities, first occurrence wins
        for document in documents {
            for entity in document.entities {
                let id = entity.id.clone();
                let path = entity.source_path.clone();
                if !graph.add_entity(entity) {
                    tracing::warn!(id = %id, file = %path.display(), "Duplicate entity id");
                    warnings.push(ParseWarning::DuplicateEntity { id, path });
                }
            }
        }

        // Phase 2: resolve references against the complete namespace
        let namespace = EntityNamespace::from_ids(graph.entities().map(|e| e.id.clone()));
        tracing::debug!(entities = namespace.len(), "Entity namespace built");

        let ids: Vec<String> = graph.entities().map(|e| e.id.clone()).collect();
        for id in &ids {
            let Some(entity) = graph.get(id).cloned() else {
                continue;
            };
            let targets = self.resolver.resolve(&entity, &namespace);

            let mut dependencies = targets.clone();
            dependencies.sort();

            for target in &targets {
                let kind = classify(&entity, target);
                graph.add_relationship(id, target, kind);
            }

            graph.set_dependencies(id, dependencies);

            // Implicit provider association from the type prefix
            if let Some(provider_id) = implicit_provider(&entity) {
                if namespace.contains(&provider_id) {
                    graph.add_relationship(id, &provider_id, RelationshipKind::Implicit);
                }
            }
        }

        tracing::info!(
            files = graph.total_files(),
            entities = graph.entity_count(),
            relationships = graph.relationship_count(),
            warnings = warnings.len(),
            "Graph assembly complete"
        );

        ParseResult { graph, warnings }
    }
}

/// Classify the kind of an edge from its endpoints.
///
/// Module → variable edges are the module's inputs; output → module edges
/// expose module results; everything else is a plain reference.
fn classify(source: &Entity, target_id: &str) -> RelationshipKind {
    match source.category {
        Category::Module if target_id.starts_with("variable.") => RelationshipKind::ModuleInput,
        Category::Output if target_id.starts_with("module.") => RelationshipKind::ModuleOutput,
        _ => RelationshipKind::Reference,
    }
}

/// The provider entity id a resource/data entity implicitly depends on.
fn implicit_provider(entity: &Entity) -> Option<String> {
    match entity.category {
        Category::Resource | Category::Data => {
            entity.provider.as_ref().map(|p| format!("provider.{p}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityExtractor;
    use crate::parser::{HclParser, Parser};
    use std::path::Path;

    fn doc(path: &str, content: &str) -> DocumentEntities {
        let blocks = HclParser::new()
            .parse_content(content, Path::new(path))
            .unwrap();
        DocumentEntities {
            path: PathBuf::from(path),
            entities: EntityExtractor::new().extract(&blocks, Path::new(path)),
        }
    }

    fn assemble(documents: Vec<DocumentEntities>) -> ParseResult {
        GraphAssembler::new().assemble(documents, Vec::new())
    }

    #[test]
    fn test_reference_edge() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}

resource "aws_instance" "web" {
  subnet_id = "${aws_vpc.main.id}"
}
"#,
        )]);

        let triples = result.graph.relationship_triples();
        assert!(triples.iter().any(|r| {
            r.source == "resource.aws_instance.web"
                && r.target == "resource.aws_vpc.main"
                && r.kind == RelationshipKind::Reference
        }));

        let web = result.graph.get("resource.aws_instance.web").unwrap();
        assert_eq!(web.dependencies, vec!["resource.aws_vpc.main"]);
    }

    #[test]
    fn test_cross_document_resolution() {
        let result = assemble(vec![
            doc(
                "network.tf",
                r#"resource "aws_vpc" "main" { cidr_block = "10.0.0.0/16" }"#,
            ),
            doc(
                "compute.tf",
                r#"resource "aws_instance" "web" { subnet_id = "${aws_vpc.main.id}" }"#,
            ),
        ]);

        assert_eq!(result.graph.metadata().total_files, 2);
        assert_eq!(result.graph.relationship_count(), 1);
    }

    #[test]
    fn test_duplicate_entity_first_wins() {
        let result = assemble(vec![
            doc("a.tf", r#"resource "aws_instance" "web" { ami = "a" }"#),
            doc("b.tf", r#"resource "aws_instance" "web" { ami = "b" }"#),
        ]);

        assert_eq!(result.graph.entity_count(), 1);
        let kept = result.graph.get("resource.aws_instance.web").unwrap();
        assert_eq!(kept.source_path, PathBuf::from("a.tf"));

        assert_eq!(result.warnings.len(), 1);
        match &result.warnings[0] {
            ParseWarning::DuplicateEntity { id, path } => {
                assert_eq!(id, "resource.aws_instance.web");
                assert_eq!(path, &PathBuf::from("b.tf"));
            }
            other => panic!("Expected duplicate warning, got {other:?}"),
        }
    }

    #[test]
    fn test_module_input_edge() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"
variable "cidr" {
  default = "10.0.0.0/16"
}

module "vpc" {
  source = "./modules/vpc"
  cidr   = "${var.cidr}"
}
"#,
        )]);

        let triples = result.graph.relationship_triples();
        assert!(triples.iter().any(|r| {
            r.source == "module.vpc"
                && r.target == "variable.cidr"
                && r.kind == RelationshipKind::ModuleInput
        }));
    }

    #[test]
    fn test_module_output_edge() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"
module "vpc" {
  source = "./modules/vpc"
}

output "vpc_id" {
  value = "${module.vpc.vpc_id}"
}
"#,
        )]);

        let triples = result.graph.relationship_triples();
        assert!(triples.iter().any(|r| {
            r.source == "output.vpc_id"
                && r.target == "module.vpc"
                && r.kind == RelationshipKind::ModuleOutput
        }));
    }

    #[test]
    fn test_implicit_provider_edge() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"
provider "aws" {
  region = "eu-west-1"
}

resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}
"#,
        )]);

        let triples = result.graph.relationship_triples();
        assert!(triples.iter().any(|r| {
            r.source == "resource.aws_vpc.main"
                && r.target == "provider.aws"
                && r.kind == RelationshipKind::Implicit
        }));
    }

    #[test]
    fn test_no_implicit_edge_without_provider_block() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"resource "aws_vpc" "main" { cidr_block = "10.0.0.0/16" }"#,
        )]);

        assert_eq!(result.graph.relationship_count(), 0);
    }

    #[test]
    fn test_referential_soundness() {
        let result = assemble(vec![doc(
            "main.tf",
            r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}

resource "aws_instance" "web" {
  subnet_id = "${aws_vpc.main.id}"
  ghost     = "${aws_eip.missing.id}"
}
"#,
        )]);

        for r in result.graph.relationship_triples() {
            assert!(result.graph.contains(&r.source));
            assert!(result.graph.contains(&r.target));
        }
    }

    #[test]
    fn test_empty_corpus() {
        let result = assemble(Vec::new());

        assert!(result.graph.is_empty());
        assert_eq!(result.graph.metadata().total_files, 0);
        assert!(!result.has_warnings());
    }
}
