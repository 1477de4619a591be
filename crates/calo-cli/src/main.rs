//! CALO CLI - Risk analysis from the command line
//!
//! Reads a raw signal snapshot as JSON, runs it through the engine and prints
//! the dual-view analysis. Logs go to stderr so stdout stays machine-readable.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod input;

use calo_engine::{EngineSettings, RiskPipeline};

/// CALO CLI application
#[derive(Parser, Debug)]
#[command(name = "calo")]
#[command(about = "CALO - City signal normalization and risk detection", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CALO_CONFIG", global = true)]
    config: Option<String>,

    /// Log level, overrides the configured one (RUST_LOG wins over both)
    #[arg(long, env = "CALO_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a raw signal snapshot
    Analyze {
        /// JSON file with raw signals, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },

    /// Validate configuration and print the effective settings
    CheckConfig,

    /// Print the active protocol catalog
    Catalog,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = EngineSettings::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    init_tracing(
        cli.log_level.as_deref().unwrap_or(&settings.logging.level),
        cli.json_logs || settings.logging.json,
    );

    match cli.command {
        Commands::Analyze { input, pretty } => {
            let config = settings.build().context("failed to build engine")?;
            let raw = input::read_signals(&input)?;
            let result = RiskPipeline::new(Arc::new(config)).analyze(&raw);
            print_json(&result, pretty)
        }
        Commands::CheckConfig => {
            let config = settings.build().context("failed to build engine")?;
            tracing::info!(protocols = config.catalog().len(), "configuration OK");
            print_json(&settings, true)
        }
        Commands::Catalog => {
            let config = settings.build().context("failed to build engine")?;
            print_json(config.catalog(), true)
        }
    }
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["calo", "analyze"]).unwrap();
        match cli.command {
            Commands::Analyze { input, pretty } => {
                assert_eq!(input, "-");
                assert!(!pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "calo",
            "analyze",
            "--input",
            "signals.json",
            "--pretty",
            "--config",
            "calo.toml",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("calo.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.json_logs);
        assert!(matches!(
            cli.command,
            Commands::Analyze { ref input, pretty: true } if input == "signals.json"
        ));
    }

    #[test]
    fn test_subcommand_names() {
        assert!(matches!(
            Cli::try_parse_from(["calo", "check-config"]).unwrap().command,
            Commands::CheckConfig
        ));
        assert!(matches!(
            Cli::try_parse_from(["calo", "catalog"]).unwrap().command,
            Commands::Catalog
        ));
        assert!(Cli::try_parse_from(["calo"]).is_err());
    }
}
