//! Error types for TerraLens.
//!
//! This module defines the error hierarchy using `thiserror`. Errors fall
//! into two tiers: fatal errors (`TerraLensError`) that abort a parse
//! invocation, and per-document warnings (see [`crate::types::ParseWarning`])
//! that are collected next to the output graph. Only total absence of usable
//! input produces a fatal error; a malformed document inside a larger corpus
//! is reported as a warning and the run continues.
//!
//! # Example
//!
//! ```rust
//! use terralens::error::{TerraLensError, Result};
//!
//! fn read_document(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(|e| TerraLensError::Io {
//!         path: path.into(),
//!         source: e,
//!         src_path: file!(),
//!         src_line: line!(),
//!     })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(DirectoryNotFound { path: path.to_path_buf() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::TerraLensError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for TerraLens operations.
pub type Result<T> = std::result::Result<T, TerraLensError>;

/// The main error type for TerraLens.
#[derive(Error, Debug)]
pub enum TerraLensError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// File not found.
    #[error("File not found: {path} ({src_path}:{src_line})")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Parsing Errors
    // =========================================================================
    /// Structural syntax error in a configuration document.
    ///
    /// The message carries the underlying `hcl` diagnostic, which names the
    /// approximate line and column of the failure.
    #[error("Failed to parse '{file}' ({src_path}:{src_line}): {message}")]
    Syntax {
        /// The document being parsed
        file: PathBuf,
        /// Error message from the structural parser
        message: String,
        /// Line number (if available)
        line: Option<usize>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total)")]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<TerraLensError>,
    },
}

impl TerraLensError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Creates a `Syntax` error.
    #[must_use]
    pub fn syntax(
        file: PathBuf,
        message: String,
        line: Option<usize>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Syntax {
            file,
            message,
            line,
            src_path,
            src_line,
        }
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::Internal {
            message,
            src_path,
            src_line,
        }
    }

    /// Determines if the error is recoverable at the corpus level, meaning
    /// sibling documents should still be parsed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Syntax { .. } | Self::ConfigParse { .. } | Self::ReportGeneration { .. }
        )
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                13
            }
            Self::FileNotFound { .. } => 14,
            Self::DirectoryNotFound { .. } => 15,
            Self::ConfigParse { .. } => 18,
            Self::Multiple { .. } => 21,
            _ => 1,
        }
    }

    /// Consolidates multiple errors into a single `TerraLensError::Multiple`
    /// if there's more than one. Otherwise, returns the single error or
    /// `Ok(())` if no errors.
    pub fn collect(errors: Vec<Self>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.into_iter().next().unwrap())
        } else {
            Err(Self::Multiple {
                count: errors.len(),
                errors,
            })
        }
    }
}

impl From<std::io::Error> for TerraLensError {
    fn from(source: std::io::Error) -> Self {
        // Prefer TerraLensError::io(path, source, file!(), line!()) when a
        // path is available.
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for TerraLensError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {}", source),
            src_path: file!(),
            src_line: line!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_macro_carries_location() {
        let e = err!(FileNotFound {
            path: PathBuf::from("main.tf"),
        });
        match e {
            TerraLensError::FileNotFound { path, src_path, .. } => {
                assert_eq!(path, PathBuf::from("main.tf"));
                assert!(src_path.ends_with("error.rs"));
            }
            _ => panic!("Expected FileNotFound"),
        }
    }

    #[test]
    fn test_syntax_is_recoverable() {
        let e = err!(Syntax {
            file: PathBuf::from("main.tf"),
            message: "unbalanced braces".to_string(),
            line: Some(3),
        });
        assert!(e.is_recoverable());
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let e = err!(DirectoryNotFound {
            path: PathBuf::from("/nope"),
        });
        assert!(!e.is_recoverable());
        assert_eq!(e.exit_code(), 15);
    }

    #[test]
    fn test_collect_empty_is_ok() {
        assert!(TerraLensError::collect(Vec::new()).is_ok());
    }
}
