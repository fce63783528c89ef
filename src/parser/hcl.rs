//! HCL document parser implementation.
//!
//! Built on the `hcl-rs` crate: each document parses into an `hcl::Body`,
//! which is then lowered into semantic-free [`ConfigBlock`]s.

use crate::error::Result;
use crate::parser::{body_to_map, Parser};
use crate::types::ConfigBlock;

use hcl::{Body, Structure};
use std::path::Path;

/// Structural parser for Terraform/OpenTofu documents.
///
/// Stateless and cheap to clone; one instance can parse any number of
/// documents, including concurrently.
#[derive(Debug, Clone, Default)]
pub struct HclParser;

impl HclParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Parser for HclParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<Vec<ConfigBlock>> {
        let body: Body = hcl::from_str(content).map_err(|e| {
            crate::err!(Syntax {
                file: file_path.to_path_buf(),
                // The hcl diagnostic names the offending line and column.
                message: e.to_string(),
                line: None,
            })
        })?;

        let mut blocks = Vec::new();

        for structure in body.into_inner() {
            match structure {
                Structure::Block(block) => {
                    blocks.push(ConfigBlock {
                        keyword: block.identifier.as_str().to_string(),
                        labels: block
                            .labels
                            .iter()
                            .map(|l| l.as_str().to_string())
                            .collect(),
                        attributes: body_to_map(&block.body),
                    });
                }
                Structure::Attribute(attr) => {
                    // Top-level attributes are not valid Terraform; keep
                    // going but leave a trace.
                    tracing::debug!(
                        file = %file_path.display(),
                        key = %attr.key.as_str(),
                        "Ignoring top-level attribute"
                    );
                }
            }
        }

        tracing::debug!(
            file = %file_path.display(),
            blocks = blocks.len(),
            "Document parsed"
        );

        Ok(blocks)
    }
}
