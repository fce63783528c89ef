//! Report generation module.
//!
//! This module provides report generation in multiple formats:
//! - JSON: machine-readable report wrapping the graph wire shape
//! - Text: human-readable CLI output
//!
//! # Example
//!
//! ```rust,no_run
//! use terralens::reporter::Reporter;
//! use terralens::{Config, ReportFormat};
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//!
//! // let json = reporter.generate(&result, ReportFormat::Json)?;
//! // let text = reporter.generate(&result, ReportFormat::Text)?;
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ParseResult, ReportFormat};

pub use json::JsonReporter;
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, result: &ParseResult, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(result),
            ReportFormat::Text => TextReporter::new(&self.config).generate(result),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from a parse result.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, result: &ParseResult) -> Result<String>;
}
