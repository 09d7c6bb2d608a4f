//! xcgraph-lint CLI tool.
//!
//! Usage:
//! ```bash
//! xcgraph-lint check [OPTIONS] <GRAPH>
//! xcgraph-lint list-rules
//! xcgraph-lint order <GRAPH>
//! xcgraph-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xcgraph_lint::Severity;

mod commands;
mod config_lookup;

/// Linter for resolved Xcode project dependency graphs
#[derive(Parser)]
#[command(name = "xcgraph-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a resolved graph
    Check {
        /// Resolved graph description (JSON)
        graph: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Preset to use instead of the configured one
        #[arg(long)]
        preset: Option<String>,

        /// Lowest severity that makes the command fail
        #[arg(long)]
        fail_on: Option<Severity>,

        /// Treat resource bundle accessors as disabled
        #[arg(long)]
        disable_bundle_accessors: bool,
    },

    /// List available rules
    ListRules,

    /// Print the targets of a graph in build order
    Order {
        /// Resolved graph description (JSON)
        graph: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per issue, no summary.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            graph,
            format,
            rules,
            preset,
            fail_on,
            disable_bundle_accessors,
        } => commands::check::run(
            &graph,
            cli.config.as_deref(),
            &commands::check::CheckOptions {
                format,
                rules,
                preset,
                overrides: config_lookup::Overrides {
                    fail_on,
                    disable_bundle_accessors,
                },
            },
        ),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Order { graph } => commands::order::run(&graph),
        Commands::Init { force } => commands::init::run(force),
    }
}
