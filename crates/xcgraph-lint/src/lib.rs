//! # xcgraph-lint
//!
//! Dependency-graph linter for generated Xcode projects.
//!
//! This is the main facade crate that re-exports the core types and the
//! built-in rules, and offers one-call entry points.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xcgraph_lint::Graph;
//!
//! let graph = Graph::from_file(Path::new("graph.json"))?;
//! for issue in xcgraph_lint::lint(&graph) {
//!     eprintln!("{issue}");
//! }
//! ```
//!
//! `lint` runs the recommended preset against the real file system. Use
//! [`linter`] to honor a [`Config`] (preset, rule toggles, severity
//! overrides) and [`resolve_fail_on`] to decide when the caller should
//! abort.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use xcgraph_lint::{Config, GraphLinter};
//! use xcgraph_lint::rules::Preset;
//!
//! let linter = Preset::Minimal
//!     .rules()
//!     .register(GraphLinter::builder().config(Config::default()))
//!     .build();
//!
//! let result = linter.lint(&graph);
//! result.ensure_no_errors()?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use xcgraph_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use xcgraph_lint_rules::*;
}

mod runner;

pub use runner::{lint, lint_project, linter, resolve_fail_on, resolve_preset, RunnerError};
