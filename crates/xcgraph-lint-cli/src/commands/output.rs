//! Shared output formatting for lint results.

use anyhow::Result;
use std::fmt::Write;
use xcgraph_lint::{LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    print!("{}", render(result, format)?);
    Ok(())
}

/// Renders lint results in the specified format.
pub fn render(result: &LintResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(result)?)),
        OutputFormat::Compact => Ok(render_compact(result)),
    }
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings) = result.count_by_severity();
    let mut out = String::new();

    for issue in result.warnings().into_iter().chain(result.errors()) {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };
        let _ = writeln!(out, "{severity_indicator}: {}", issue.reason);
    }
    if !result.is_empty() {
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{}Found {} error(s), {} warning(s) in {} project(s), {} target(s)\x1b[0m",
        summary_color, errors, warnings, result.projects_checked, result.targets_checked
    );
    out
}

fn render_compact(result: &LintResult) -> String {
    result.issues.iter().fold(String::new(), |mut out, issue| {
        let _ = writeln!(out, "{issue}");
        out
    })
}
