//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `parse`: Parse configuration files and produce a report
//! - `graph`: Export the entity graph for visualization
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Parse local directories
//! terralens parse ./terraform ./modules
//!
//! # Generate JSON report
//! terralens parse ./terraform --format json --output report.json
//!
//! # Export the entity graph
//! terralens graph ./terraform --format dot --output entities.dot
//!
//! # Initialize configuration
//! terralens init
//!
//! # Validate configuration
//! terralens validate terralens.yaml
//! ```

use crate::types::{GraphFormat, ReportFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// TerraLens - Terraform/OpenTofu configuration entity graph extractor.
#[derive(Parser, Debug)]
#[command(
    name = "terralens",
    author,
    version,
    about = "Terraform/OpenTofu configuration entity graph extractor",
    long_about = "TerraLens parses Terraform/OpenTofu configuration files, extracts the \
                  declared entities (resources, data sources, modules, variables, outputs, \
                  providers), resolves the references between them, and emits the resulting \
                  graph as JSON, DOT, or Mermaid."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TERRALENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse directories or files and produce a report
    #[command(visible_alias = "p")]
    Parse(ParseArgs),

    /// Export the entity graph for visualization
    #[command(visible_alias = "g")]
    Graph(GraphArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the parse command.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Paths to parse (files or directories containing Terraform files)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Treat warnings as errors (exit code 1)
    #[arg(long)]
    pub strict: bool,

    /// Abort on the first document that fails to parse
    #[arg(long)]
    pub fail_fast: bool,

    /// Maximum depth for recursive directory traversal
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Patterns to exclude from traversal (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,
}

/// Arguments for the graph command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Paths to parse
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format for the graph
    #[arg(short, long, default_value = "json", value_enum)]
    pub format: GraphFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "terralens.yaml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_command() {
        let cli = Cli::parse_from(["terralens", "parse", "./terraform"]);
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.paths.len(), 1);
                assert_eq!(args.paths[0], PathBuf::from("./terraform"));
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::parse_from([
            "terralens",
            "parse",
            "./terraform",
            "--format",
            "json",
            "--output",
            "report.json",
            "--strict",
        ]);
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.output, Some(PathBuf::from("report.json")));
                assert!(args.strict);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_with_excludes() {
        let cli = Cli::parse_from([
            "terralens",
            "parse",
            "./terraform",
            "--exclude",
            "**/.terraform/**",
            "--exclude",
            "**/vendored/**",
        ]);
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.exclude_patterns.len(), 2);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_graph_command() {
        let cli = Cli::parse_from(["terralens", "graph", "./terraform", "--format", "mermaid"]);
        match cli.command {
            Commands::Graph(args) => {
                assert_eq!(args.format, GraphFormat::Mermaid);
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_init_command() {
        let cli = Cli::parse_from(["terralens", "init"]);
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["terralens", "validate", "custom.yaml"]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.config, PathBuf::from("custom.yaml"));
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from([
            "terralens",
            "-vvv",
            "--config",
            "custom.yaml",
            "parse",
            "./terraform",
        ]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn test_alias() {
        let cli = Cli::parse_from(["terralens", "p", "./terraform"]);
        assert!(matches!(cli.command, Commands::Parse(_)));
    }
}
