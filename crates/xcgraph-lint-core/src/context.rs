//! Context types for rule execution.

use crate::fs::FileSystem;
use crate::graph::Graph;
use crate::model::Project;
use crate::traversal::GraphTraversal;
use serde::{Deserialize, Serialize};

/// Generation options that change what rules accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintOptions {
    /// When set, libraries and static frameworks get no generated resource
    /// bundle and therefore cannot carry resources.
    #[serde(default)]
    pub disable_bundle_accessors: bool,
}

/// Context provided to graph-wide rules.
#[derive(Clone, Copy)]
pub struct GraphContext<'a> {
    /// The graph being linted.
    pub graph: &'a Graph,
    /// Traversal helpers over `graph`.
    pub traversal: GraphTraversal<'a>,
    /// File-existence checks.
    pub fs: &'a dyn FileSystem,
    /// Generation options.
    pub options: &'a LintOptions,
}

impl<'a> GraphContext<'a> {
    /// Creates a new graph context.
    #[must_use]
    pub fn new(graph: &'a Graph, fs: &'a dyn FileSystem, options: &'a LintOptions) -> Self {
        Self {
            graph,
            traversal: GraphTraversal::new(graph),
            fs,
            options,
        }
    }
}

/// Context provided to project-scoped rules.
#[derive(Clone, Copy)]
pub struct ProjectContext<'a> {
    /// The project being linted.
    pub project: &'a Project,
    /// File-existence checks.
    pub fs: &'a dyn FileSystem,
    /// Generation options.
    pub options: &'a LintOptions,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(project: &'a Project, fs: &'a dyn FileSystem, options: &'a LintOptions) -> Self {
        Self {
            project,
            fs,
            options,
        }
    }
}
