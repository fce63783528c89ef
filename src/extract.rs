//! Entity extraction.
//!
//! Walks the structural block tree of one document and materializes one
//! [`Entity`] per declared block, assigning the canonical id and semantic
//! category. Attributes are copied verbatim; no evaluation happens here.

use crate::types::{Category, ConfigBlock, Entity};
use std::path::Path;

/// Extracts entities from structurally parsed blocks.
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    /// Create a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Materialize entities for every declared block in one document.
    ///
    /// Non-declaring blocks (`terraform`, `locals`) and blocks missing
    /// their required labels are skipped.
    #[must_use]
    pub fn extract(&self, blocks: &[ConfigBlock], source_path: &Path) -> Vec<Entity> {
        blocks
            .iter()
            .filter_map(|block| self.extract_block(block, source_path))
            .collect()
    }

    fn extract_block(&self, block: &ConfigBlock, source_path: &Path) -> Option<Entity> {
        let category = match Category::from_keyword(&block.keyword) {
            Some(c) => c,
            None => {
                tracing::debug!(
                    keyword = %block.keyword,
                    file = %source_path.display(),
                    "Block declares no entity"
                );
                return None;
            }
        };

        let (block_type, name) = if category.is_typed() {
            match (block.labels.first(), block.labels.get(1)) {
                (Some(t), Some(n)) => (t.clone(), n.clone()),
                _ => {
                    tracing::warn!(
                        keyword = %block.keyword,
                        file = %source_path.display(),
                        "Typed block missing type/name labels, skipping"
                    );
                    return None;
                }
            }
        } else {
            match block.labels.first() {
                Some(n) => (String::new(), n.clone()),
                None => {
                    tracing::warn!(
                        keyword = %block.keyword,
                        file = %source_path.display(),
                        "Block missing name label, skipping"
                    );
                    return None;
                }
            }
        };

        let id = if category.is_typed() {
            format!("{category}.{block_type}.{name}")
        } else {
            format!("{category}.{name}")
        };

        let provider = match category {
            Category::Provider => Some(name.clone()),
            Category::Resource | Category::Data => type_provider_prefix(&block_type),
            _ => None,
        };

        Some(Entity {
            id,
            category,
            block_type,
            name,
            provider,
            attributes: block.attributes.clone(),
            source_path: source_path.to_path_buf(),
            dependencies: Vec::new(),
        })
    }
}

/// Derive the provider hint from a resource/data type token
/// (`aws_instance` → `aws`).
fn type_provider_prefix(block_type: &str) -> Option<String> {
    block_type
        .split('_')
        .next()
        .filter(|p| !p.is_empty())
        .map(String::from)
}
