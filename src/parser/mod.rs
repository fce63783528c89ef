//! Structural parsing of Terraform/OpenTofu documents.
//!
//! This module lowers HCL (HashiCorp Configuration Language) source text
//! into a tree of typed [`ConfigBlock`]s with their attribute maps, without
//! attaching any semantic meaning. Interpolation expressions are rendered
//! back to literal text, never evaluated.
//!
//! # Supported Constructs
//!
//! - Top-level blocks with zero or more labels (`resource "aws_vpc" "main"`)
//! - Single-line and multi-line blocks, comments
//! - Nested blocks (lifecycle, provisioner, ingress, ...) captured as nested
//!   attribute maps under their keyword
//! - Quoted-string, bare literal, numeric, boolean, list and object values

mod hcl;
mod value;

pub use hcl::HclParser;
pub use value::{body_to_map, expression_to_value};

use crate::types::ConfigBlock;

/// Trait for parsing document content into structural blocks.
///
/// This trait allows for different parsing implementations
/// (e.g., for testing with mock parsers).
pub trait Parser: Send + Sync {
    /// Parse a single document's contents into its top-level blocks.
    ///
    /// # Errors
    ///
    /// Returns a `Syntax` error naming the document path if the block
    /// structure is malformed.
    fn parse_content(
        &self,
        content: &str,
        file_path: &std::path::Path,
    ) -> crate::Result<Vec<ConfigBlock>>;
}
