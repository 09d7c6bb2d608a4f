//! # xcgraph-lint-core
//!
//! Core framework for linting a resolved project/target dependency graph
//! before project generation.
//!
//! This crate provides the foundational types for building graph linters:
//!
//! - [`model`] value types for projects, targets, and settings
//! - [`Graph`], an arena of nodes with forward and reverse edges
//! - [`GraphTraversal`] for transitive dependency queries
//! - [`GraphRule`] and [`ProjectRule`] traits for checks
//! - [`GraphLinter`] for orchestrating rule execution
//! - [`LintingIssue`] and [`LintResult`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use xcgraph_lint_core::{Graph, GraphLinter};
//!
//! let graph = Graph::from_file(Path::new("graph.json"))?;
//! let linter = GraphLinter::builder()
//!     .graph_rule(MyRule::new())
//!     .build();
//!
//! let result = linter.lint(&graph);
//! print!("{}", result.format_report());
//! result.ensure_no_errors()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod fs;
mod graph;
mod issue;
mod linter;
pub mod model;
mod rule;
mod traversal;

pub use config::{Config, ConfigError, LinterConfig, RuleConfig};
pub use context::{GraphContext, LintOptions, ProjectContext};
pub use fs::{FileSystem, OsFileSystem};
pub use graph::{Graph, GraphBuilder, GraphDescription, GraphError, GraphNode, NodeId};
pub use issue::{FatalLintingIssues, LintResult, LintingIssue, Severity};
pub use linter::{GraphLinter, GraphLinterBuilder};
pub use rule::{GraphRule, GraphRuleBox, ProjectRule, ProjectRuleBox};
pub use traversal::{GraphTarget, GraphTraversal};
