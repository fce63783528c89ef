//! # TerraLens
//!
//! A Terraform/OpenTofu configuration entity graph extractor.
//!
//! TerraLens reads a corpus of configuration documents, parses their block
//! structure, materializes one entity per declared block, resolves the
//! references entities make to one another, and assembles everything into a
//! directed graph suitable for rendering or programmatic analysis.
//!
//! ## Features
//!
//! - **HCL parsing**: structural parsing of `.tf` documents, no evaluation
//! - **Entity extraction**: resources, data sources, modules, variables,
//!   outputs, and providers with canonical ids
//! - **Reference resolution**: conservative syntactic matching of
//!   interpolation expressions against the declared entity namespace
//! - **Entity graph**: typed relationships (reference, module input/output,
//!   implicit provider association)
//! - **Multiple output formats**: JSON wire format, DOT, Mermaid, plus
//!   text and JSON reports
//!
//! ## Example
//!
//! ```rust,no_run
//! use terralens::{Extractor, Config, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let extractor = Extractor::new(config);
//!
//!     // Parse a local directory
//!     let result = extractor.parse_path("./terraform").await?;
//!
//!     // Generate a report
//!     let report = result.generate_report(ReportFormat::Json)?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

// Note: README is not included as doc to avoid doctest failures
// See README.md for full documentation
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod loader;
pub mod parser;
pub mod reporter;
pub mod resolve;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, TerraLensError};
pub use graph::{Graph, GraphMetadata, Relationship, RelationshipKind};
pub use types::{
    Category, Document, Entity, GraphFormat, ParseResult, ParseWarning, ReportFormat,
};

use crate::graph::DocumentEntities;
use crate::parser::Parser;
use rayon::prelude::*;
use std::path::Path;

/// Main orchestrator that coordinates the extraction pipeline.
///
/// The `Extractor` is the primary entry point for using TerraLens as a
/// library. It handles:
/// - Loading documents from files and directories
/// - Coordinating parsing, entity extraction, and graph assembly
///
/// # Example
///
/// ```rust,no_run
/// use terralens::{Extractor, Config};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = Config::default();
///     let extractor = Extractor::new(config);
///
///     let result = extractor.parse_paths(&["./network", "./compute"]).await?;
///     println!("Found {} entities", result.graph.entity_count());
///     Ok(())
/// }
/// ```
pub struct Extractor {
    config: Config,
}

impl Extractor {
    /// Create a new extractor with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse a single local path (file or directory).
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist or isn't readable. Syntax
    /// errors in individual documents are contained as warnings unless
    /// `fail_fast` is set.
    pub async fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult> {
        self.parse_paths(&[path.as_ref()]).await
    }

    /// Parse multiple local paths.
    ///
    /// # Errors
    ///
    /// Returns an error if any path fails to load.
    pub async fn parse_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ParseResult> {
        let loader = loader::DocumentLoader::new(&self.config);
        let documents = loader.load(paths).await?;
        self.parse_documents(&documents)
    }

    /// Parse an in-memory document corpus.
    ///
    /// This is the pure core of the pipeline: no I/O, no shared state, and
    /// output depends only on the submitted documents. Documents are parsed
    /// structurally in parallel; entity merge and reference resolution run
    /// on the assembled whole.
    ///
    /// # Errors
    ///
    /// Returns an error only when `fail_fast` is set and a document fails
    /// structurally. Otherwise failed documents are skipped and reported as
    /// warnings on the result.
    pub fn parse_documents(&self, documents: &[Document]) -> Result<ParseResult> {
        let parser = parser::HclParser::new();
        let extractor = extract::EntityExtractor::new();

        tracing::info!(documents = documents.len(), "Parsing corpus");

        // Structural parsing is per-document and independent; the collect
        // preserves corpus order.
        let parsed: Vec<(&Document, Result<Vec<types::ConfigBlock>>)> = documents
            .par_iter()
            .map(|doc| (doc, parser.parse_content(&doc.content, &doc.path)))
            .collect();

        let mut warnings = Vec::new();
        let mut per_document = Vec::new();

        for (document, outcome) in parsed {
            match outcome {
                Ok(blocks) => {
                    let entities = extractor.extract(&blocks, &document.path);
                    per_document.push(DocumentEntities {
                        path: document.path.clone(),
                        entities,
                    });
                }
                Err(e) if self.config.scan.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        file = %document.path.display(),
                        error = %e,
                        "Skipping document with syntax errors"
                    );
                    warnings.push(ParseWarning::Syntax {
                        path: document.path.clone(),
                        message: e.to_string(),
                        line: None,
                    });
                }
            }
        }

        Ok(graph::GraphAssembler::new().assemble(per_document, warnings))
    }
}
