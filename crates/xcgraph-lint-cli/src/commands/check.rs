//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use xcgraph_lint::{linter, Graph};

use crate::config_lookup::{ConfigLookup, Overrides};
use crate::OutputFormat;

/// Flags of the check command.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Preset overriding the configured one.
    pub preset: Option<String>,
    /// Flags overriding the configuration file.
    pub overrides: Overrides,
}

/// Runs the check command.
pub fn run(graph_path: &Path, config_path: Option<&Path>, options: &CheckOptions) -> Result<()> {
    let graph = Graph::from_file(graph_path)
        .with_context(|| format!("Failed to load graph: {}", graph_path.display()))?;

    let settings = ConfigLookup::for_graph(graph_path, &graph, config_path).settings(options.overrides)?;
    tracing::debug!("Config origin: {:?}", settings.origin);

    let selected: Vec<&str> = options
        .rules
        .as_deref()
        .map(|filter| filter.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let linter = linter(options.preset.as_deref(), &selected, settings.config)?;

    tracing::info!(
        "Linting {} with {} rules",
        graph_path.display(),
        linter.rule_count()
    );

    let result = linter.lint(&graph);

    super::output::print(&result, options.format)?;

    if let Err(fatal) = result.ensure_below(settings.fail_on) {
        eprintln!("{:?}", miette::Report::new(fatal));
        std::process::exit(1);
    }

    Ok(())
}
