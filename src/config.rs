//! Configuration module for TerraLens.
//!
//! Handles loading and validating configuration from:
//! - YAML configuration files (`terralens.yaml`)
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # terralens.yaml
//!
//! # Scanning options
//! scan:
//!   exclude_patterns:
//!     - "**/test/**"
//!     - "**/modules-cache/**"
//!   max_depth: 100
//!   follow_links: true
//!   fail_fast: false
//!
//! # Output options
//! output:
//!   pretty: true
//!   verbose: false
//! ```

use crate::error::{Result, TerraLensError};
use serde::{Deserialize, Serialize};

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Patterns to exclude from scanning (glob patterns).
    pub exclude_patterns: Vec<String>,

    /// Maximum depth for recursive directory scanning.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Follow symbolic links while walking directories.
    #[serde(default = "default_true")]
    pub follow_links: bool,

    /// Abort the whole run on the first malformed document instead of
    /// skipping it and continuing with its siblings.
    pub fail_fast: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            max_depth: default_max_depth(),
            follow_links: true,
            fail_fast: false,
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Verbose output mode.
    pub verbose: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            verbose: false,
        }
    }
}

/// The main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Scanning options
    pub scan: ScanOptions,
    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigParse` error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TerraLensError::ConfigParse {
            message: format!("invalid YAML configuration: {e}"),
            source: Some(Box::new(e)),
            src_path: file!(),
            src_line: line!(),
        })
    }

    /// Serialize this configuration back to YAML.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigParse` error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TerraLensError::ConfigParse {
            message: format!("failed to serialize configuration: {e}"),
            source: Some(Box::new(e)),
            src_path: file!(),
            src_line: line!(),
        })
    }

    /// An example configuration file with comments, for `terralens init`.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# TerraLens configuration
#
# All sections are optional; missing values fall back to defaults.

# Scanning options
scan:
  # Glob patterns excluded from directory scans
  exclude_patterns:
    - "**/.terragrunt-cache/**"
  # Maximum directory recursion depth
  max_depth: 100
  # Follow symbolic links
  follow_links: true
  # Abort on the first malformed document instead of skipping it
  fail_fast: false

# Output options
output:
  # Pretty-print JSON reports
  pretty: true
"#
        .to_string()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigParse` error if a value is out of range or a glob
    /// pattern is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(TerraLensError::ConfigParse {
                message: "scan.max_depth must be at least 1".to_string(),
                source: None,
                src_path: file!(),
                src_line: line!(),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(TerraLensError::ConfigParse {
                    message: format!("invalid exclude pattern '{pattern}': {e}"),
                    source: None,
                    src_path: file!(),
                    src_line: line!(),
                });
            }
        }

        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_depth() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.max_depth, 100);
        assert!(!config.scan.fail_fast);
        assert!(config.scan.exclude_patterns.is_empty());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
scan:
  exclude_patterns:
    - "**/vendor/**"
  fail_fast: true
output:
  pretty: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.scan.fail_fast);
        assert!(!config.output.pretty);
        assert!(config
            .scan
            .exclude_patterns
            .contains(&"**/vendor/**".to_string()));
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(Config::from_yaml("scan: [not, a, map]").is_err());
    }

    #[test]
    fn test_example_yaml_round_trips() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut config = Config::default();
        config.scan.exclude_patterns.push("[".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.scan.max_depth = 0;
        assert!(config.validate().is_err());
    }
}
