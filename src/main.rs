//! TerraLens CLI entry point.
//!
//! This binary provides the command-line interface for TerraLens.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use terralens::cli::{Cli, Commands, GraphArgs, ParseArgs};
use terralens::{Config, Extractor};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Run the appropriate command
    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // terralens at the requested level, everything else at warn
            EnvFilter::new(format!("warn,terralens={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Parse(args) => run_parse(config, args).await,
        Commands::Graph(args) => run_graph(config, args).await,

        Commands::Init => {
            // Generate example configuration file
            let config_path = std::path::Path::new("terralens.yaml");
            if config_path.exists() {
                anyhow::bail!(
                    "Configuration file already exists: {}",
                    config_path.display()
                );
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: terralens.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            let config_content = std::fs::read_to_string(&args.config)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

async fn run_parse(mut config: Config, args: ParseArgs) -> anyhow::Result<ExitCode> {
    apply_scan_overrides(
        &mut config,
        &args.exclude_patterns,
        args.max_depth,
        args.fail_fast,
    );

    let extractor = Extractor::new(config.clone());
    let result = extractor.parse_paths(&args.paths).await?;

    let reporter = terralens::reporter::Reporter::new(&config);
    let report = reporter.generate(&result, args.format)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &report)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else {
        println!("{report}");
    }

    // Return appropriate exit code
    let exit_code = if result.all_documents_failed() {
        2 // Nothing could be parsed
    } else if result.has_warnings() && args.strict {
        1 // Warnings in strict mode
    } else {
        0 // Success
    };

    Ok(ExitCode::from(exit_code))
}

async fn run_graph(config: Config, args: GraphArgs) -> anyhow::Result<ExitCode> {
    let extractor = Extractor::new(config);
    let result = extractor.parse_paths(&args.paths).await?;

    let graph_output = terralens::graph::export_graph(&result.graph, args.format)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &graph_output)?;
        tracing::info!(path = %output_path.display(), "Graph written");
    } else {
        println!("{graph_output}");
    }

    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }

    Ok(ExitCode::from(0))
}

fn apply_scan_overrides(
    config: &mut Config,
    exclude_patterns: &[String],
    max_depth: Option<usize>,
    fail_fast: bool,
) {
    config
        .scan
        .exclude_patterns
        .extend(exclude_patterns.iter().cloned());
    if let Some(depth) = max_depth {
        config.scan.max_depth = depth;
    }
    if fail_fast {
        config.scan.fail_fast = true;
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    // Look for default config files
    let default_paths = ["terralens.yaml", "terralens.yml", ".terralens.yaml"];
    for path in &default_paths {
        if std::path::Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
