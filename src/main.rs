//! Trellis CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Connectivity matrix and application catalog from architecture models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to .trellis.toml in the working directory)
    #[arg(short, long, default_value = trellis_core::CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
    Domain,
    BusinessArea,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the interface connectivity matrix, optionally compared to a baseline
    Matrix {
        /// Current model snapshot (.json, .yaml)
        #[arg(short, long)]
        model: PathBuf,

        /// Baseline model snapshot to compare against
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },
    /// List applications with their domains and business areas
    Catalog {
        /// Model snapshot (.json, .yaml)
        #[arg(short, long)]
        model: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },
    /// Resolve the classification ancestors of one node
    Resolve {
        /// Model snapshot (.json, .yaml)
        #[arg(short, long)]
        model: PathBuf,

        /// Node key in the snapshot
        #[arg(short, long)]
        node: String,

        #[arg(short, long, value_enum, default_value = "domain")]
        kind: Kind,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "trellis={0},trellis_core={0},trellis_report={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Trellis v{}", env!("CARGO_PKG_VERSION"));
    let config = trellis_core::TrellisConfig::load(&cli.config)?;

    match cli.command {
        Commands::Matrix { model, baseline, output, format } => {
            commands::matrix(&config, &model, baseline.as_deref(), &output, format)
        }
        Commands::Catalog { model, output, format } => {
            commands::catalog(&config, &model, &output, format)
        }
        Commands::Resolve { model, node, kind } => {
            commands::resolve(&config, &model, &node, kind)
        }
        Commands::Version => {
            println!("Trellis v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
