//! Document loader.
//!
//! Reads one or more configuration documents (single files or directory
//! trees) into raw text, tagging each with its originating path. Directory
//! mode recurses, filters to Terraform file extensions, and silently skips
//! everything else; a directory with zero matching files yields an empty
//! sequence so downstream stages can report "no entities found" instead of
//! failing.

use crate::config::Config;
use crate::error::{Result, TerraLensError};
use crate::types::Document;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions recognized as Terraform/OpenTofu documents.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Directory entries always skipped during scanning.
pub const SKIP_FILES: &[&str] = &[".terraform", ".terragrunt-cache", "terraform.tfstate"];

/// Loads configuration documents from the file system.
pub struct DocumentLoader {
    config: Config,
}

impl DocumentLoader {
    /// Create a new loader with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Load documents from a list of file or directory paths.
    ///
    /// Files are loaded as-is; directories are walked recursively in a
    /// deterministic (name-sorted) order.
    ///
    /// # Errors
    ///
    /// Returns an error if a named path does not exist or cannot be read.
    pub async fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                documents.extend(self.load_directory(path).await?);
            } else if path.is_file() {
                documents.push(self.load_file(path).await?);
            } else {
                return Err(crate::err!(FileNotFound {
                    path: path.to_path_buf(),
                }));
            }
        }

        Ok(documents)
    }

    /// Load all Terraform documents under a directory tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory doesn't exist or a matched file
    /// cannot be read.
    pub async fn load_directory(&self, path: &Path) -> Result<Vec<Document>> {
        if !path.exists() {
            return Err(crate::err!(DirectoryNotFound {
                path: path.to_path_buf(),
            }));
        }

        let mut documents = Vec::new();

        // Sorted traversal keeps discovery order, and therefore entity
        // order, stable across runs.
        for entry in WalkDir::new(path)
            .follow_links(self.config.scan.follow_links)
            .max_depth(self.config.scan.max_depth)
            .sort_by_file_name()
            .into_iter()
            // Skip rules apply to entries found during the walk, never to
            // the root the caller named explicitly.
            .filter_entry(|e| e.depth() == 0 || !self.should_skip(e.path()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let file_path = entry.path();

            if file_path.is_dir() {
                continue;
            }

            if !is_terraform_file(file_path) {
                continue;
            }

            tracing::debug!(file = %file_path.display(), "Loading document");
            documents.push(self.load_file(file_path).await?);
        }

        tracing::info!(
            path = %path.display(),
            documents = documents.len(),
            "Directory scan complete"
        );

        Ok(documents)
    }

    /// Load a single named document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn load_file(&self, path: &Path) -> Result<Document> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TerraLensError::io(path, e, file!(), line!()))?;

        Ok(Document::new(path, content))
    }

    /// Check if a path should be skipped entirely.
    fn should_skip(&self, path: &Path) -> bool {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            // Hidden files/directories
            if file_name.starts_with('.') {
                tracing::debug!(path = %path.display(), reason = "hidden", "Skipping path");
                return true;
            }

            if SKIP_FILES.iter().any(|s| file_name == *s) {
                tracing::debug!(path = %path.display(), reason = "known skip file", "Skipping path");
                return true;
            }

            if self.config.scan.exclude_patterns.iter().any(|pattern| {
                glob::Pattern::new(pattern)
                    .map(|p| p.matches(file_name))
                    .unwrap_or(false)
            }) {
                tracing::debug!(path = %path.display(), reason = "exclude pattern", "Skipping path");
                return true;
            }
        }

        false
    }
}

/// Check if a file is a Terraform document by extension.
#[must_use]
pub fn is_terraform_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    TERRAFORM_EXTENSIONS
        .iter()
        .any(|ext| path_str.ends_with(ext))
}
