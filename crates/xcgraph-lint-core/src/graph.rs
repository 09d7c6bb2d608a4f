//! Arena-backed dependency graph over targets and precompiled artifacts.
//!
//! Every target of every project becomes a node; declared dependencies are
//! resolved into edges when the graph is built. Precompiled artifacts,
//! package products, and SDKs are leaf nodes.

use crate::model::{CodeCoverageMode, Linking, Project, Scheme, Target, TargetDependency};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Index of a node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GraphNode {
    /// A target declared by the project at `path`.
    Target {
        /// Target name.
        name: String,
        /// Project path.
        path: PathBuf,
    },
    /// A precompiled framework.
    Framework {
        /// Path to the `.framework`.
        path: PathBuf,
        /// Linking of the binary.
        linking: Linking,
        /// Whether Carthage produced it.
        is_carthage: bool,
    },
    /// A precompiled XCFramework.
    #[serde(rename = "xcframework")]
    XcFramework {
        /// Path to the `.xcframework`.
        path: PathBuf,
        /// Linking of the binaries.
        linking: Linking,
    },
    /// A precompiled library.
    Library {
        /// Path to the library binary.
        path: PathBuf,
        /// Linking of the library.
        linking: Linking,
    },
    /// A package product used by the project at `path`.
    Package {
        /// Product name.
        product: String,
        /// Project path.
        path: PathBuf,
        /// Linking of the product.
        linking: Linking,
    },
    /// A system SDK.
    Sdk {
        /// SDK file name.
        name: String,
    },
}

impl GraphNode {
    /// Display name of the node.
    ///
    /// Precompiled artifacts are named after the file stem of their path.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Target { name, .. } | Self::Sdk { name } => name.clone(),
            Self::Package { product, .. } => product.clone(),
            Self::Framework { path, .. }
            | Self::XcFramework { path, .. }
            | Self::Library { path, .. } => path
                .file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned()),
        }
    }

    /// Returns true for precompiled artifacts and packages linked statically.
    ///
    /// Target nodes are classified by their product type instead.
    #[must_use]
    pub fn is_static_artifact(&self) -> bool {
        match self {
            Self::Framework { linking, .. }
            | Self::XcFramework { linking, .. }
            | Self::Library { linking, .. }
            | Self::Package { linking, .. } => *linking == Linking::Static,
            Self::Target { .. } | Self::Sdk { .. } => false,
        }
    }

    /// Kind label used in static linkage diagnostics.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Target { .. } => "Target",
            Self::Framework { .. } => "Framework",
            Self::XcFramework { .. } => "XCFramework",
            Self::Library { .. } => "Library",
            Self::Package { .. } => "Package",
            Self::Sdk { .. } => "SDK",
        }
    }

    fn from_dependency(dependency: &TargetDependency, project_path: &Path) -> Self {
        match dependency {
            TargetDependency::Target { name } => Self::Target {
                name: name.clone(),
                path: project_path.to_path_buf(),
            },
            TargetDependency::Project { target, path } => Self::Target {
                name: target.clone(),
                path: path.clone(),
            },
            TargetDependency::Framework {
                path,
                linking,
                is_carthage,
            } => Self::Framework {
                path: path.clone(),
                linking: *linking,
                is_carthage: *is_carthage,
            },
            TargetDependency::XcFramework { path, linking } => Self::XcFramework {
                path: path.clone(),
                linking: *linking,
            },
            TargetDependency::Library { path, linking } => Self::Library {
                path: path.clone(),
                linking: *linking,
            },
            TargetDependency::Package { product, linking } => Self::Package {
                product: product.clone(),
                path: project_path.to_path_buf(),
                linking: *linking,
            },
            TargetDependency::Sdk { name, .. } => Self::Sdk { name: name.clone() },
        }
    }
}

/// Errors raised while building or loading a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A dependency names a target no project declares.
    #[error("Target '{from}' depends on '{name}' at path {path}, which is not declared by any project")]
    UnknownTarget {
        /// Name of the depending target.
        from: String,
        /// Missing target name.
        name: String,
        /// Project path the missing target was expected in.
        path: PathBuf,
    },

    /// Two targets share a project path and name.
    #[error("Target '{name}' is declared more than once in the project at {path}")]
    DuplicateTarget {
        /// Duplicated target name.
        name: String,
        /// Project path.
        path: PathBuf,
    },

    /// IO error reading a graph file.
    #[error("Failed to read graph file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The graph description is malformed.
    #[error("Failed to parse graph: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

/// Serialized form of a resolved graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDescription {
    /// Graph name, usually the workspace name.
    #[serde(default)]
    pub name: String,
    /// Root directory of the graph.
    #[serde(default)]
    pub path: PathBuf,
    /// Projects the workspace lists explicitly. Empty means every project.
    #[serde(default)]
    pub workspace_projects: Vec<PathBuf>,
    /// Schemes the workspace declares.
    #[serde(default)]
    pub workspace_schemes: Vec<Scheme>,
    /// Code coverage of the generated workspace schemes.
    #[serde(default)]
    pub code_coverage_mode: Option<CodeCoverageMode>,
    /// All loaded projects.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Builder for a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    name: String,
    path: PathBuf,
    workspace_projects: Vec<PathBuf>,
    workspace_schemes: Vec<Scheme>,
    code_coverage_mode: Option<CodeCoverageMode>,
    projects: Vec<Project>,
}

impl GraphBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the graph name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the graph root directory.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds a project.
    #[must_use]
    pub fn project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    /// Marks a project as listed by the workspace.
    #[must_use]
    pub fn workspace_project(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_projects.push(path.into());
        self
    }

    /// Adds a scheme declared by the workspace.
    #[must_use]
    pub fn workspace_scheme(mut self, scheme: Scheme) -> Self {
        self.workspace_schemes.push(scheme);
        self
    }

    /// Sets the code coverage of the generated workspace schemes.
    #[must_use]
    pub fn code_coverage_mode(mut self, mode: CodeCoverageMode) -> Self {
        self.code_coverage_mode = Some(mode);
        self
    }

    /// Resolves declared dependencies and builds the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency references an undeclared target or
    /// a target is declared twice.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut graph = Graph {
            name: self.name,
            path: self.path,
            workspace_projects: self.workspace_projects,
            workspace_schemes: self.workspace_schemes,
            code_coverage_mode: self.code_coverage_mode,
            projects: self.projects,
            nodes: Vec::new(),
            node_ids: HashMap::new(),
            forward: Vec::new(),
            reverse: Vec::new(),
            node_targets: HashMap::new(),
        };

        let mut locations = Vec::new();
        for (p, project) in graph.projects.iter().enumerate() {
            for (t, target) in project.targets.iter().enumerate() {
                locations.push((
                    GraphNode::Target {
                        name: target.name.clone(),
                        path: project.path.clone(),
                    },
                    (p, t),
                ));
            }
        }
        for (node, location) in locations {
            if graph.node_ids.contains_key(&node) {
                let GraphNode::Target { name, path } = node else {
                    continue;
                };
                return Err(GraphError::DuplicateTarget { name, path });
            }
            let id = graph.add_node(node);
            graph.node_targets.insert(id, location);
        }

        let mut edges = Vec::new();
        for project in &graph.projects {
            for target in &project.targets {
                let from = GraphNode::Target {
                    name: target.name.clone(),
                    path: project.path.clone(),
                };
                for dependency in &target.dependencies {
                    edges.push((
                        from.clone(),
                        GraphNode::from_dependency(dependency, &project.path),
                        target.name.clone(),
                    ));
                }
            }
        }
        for (from, to, from_name) in edges {
            if let GraphNode::Target { name, path } = &to {
                if !graph.node_ids.contains_key(&to) {
                    return Err(GraphError::UnknownTarget {
                        from: from_name,
                        name: name.clone(),
                        path: path.clone(),
                    });
                }
            }
            let from = graph.add_node(from);
            let to = graph.add_node(to);
            graph.add_edge(from, to);
        }

        debug!(
            "Built graph '{}' with {} nodes and {} projects",
            graph.name,
            graph.nodes.len(),
            graph.projects.len()
        );
        Ok(graph)
    }
}

/// The resolved dependency graph.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    path: PathBuf,
    workspace_projects: Vec<PathBuf>,
    workspace_schemes: Vec<Scheme>,
    code_coverage_mode: Option<CodeCoverageMode>,
    projects: Vec<Project>,
    nodes: Vec<GraphNode>,
    node_ids: HashMap<GraphNode, NodeId>,
    forward: Vec<Vec<NodeId>>,
    reverse: Vec<Vec<NodeId>>,
    node_targets: HashMap<NodeId, (usize, usize)>,
}

impl Graph {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Builds a graph from its serialized description.
    ///
    /// # Errors
    ///
    /// Returns an error if dependencies cannot be resolved.
    pub fn from_description(description: GraphDescription) -> Result<Self, GraphError> {
        let mut builder = Self::builder()
            .name(description.name)
            .path(description.path);
        for path in description.workspace_projects {
            builder = builder.workspace_project(path);
        }
        for scheme in description.workspace_schemes {
            builder = builder.workspace_scheme(scheme);
        }
        if let Some(mode) = description.code_coverage_mode {
            builder = builder.code_coverage_mode(mode);
        }
        for project in description.projects {
            builder = builder.project(project);
        }
        builder.build()
    }

    /// Parses a graph from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or dependencies cannot be resolved.
    pub fn from_json(content: &str) -> Result<Self, GraphError> {
        let description: GraphDescription =
            serde_json::from_str(content).map_err(|e| GraphError::Parse {
                message: e.to_string(),
            })?;
        Self::from_description(description)
    }

    /// Loads a graph from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Graph root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All projects, in load order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Projects the workspace lists explicitly.
    #[must_use]
    pub fn workspace_projects(&self) -> &[PathBuf] {
        &self.workspace_projects
    }

    /// Schemes the workspace declares.
    #[must_use]
    pub fn workspace_schemes(&self) -> &[Scheme] {
        &self.workspace_schemes
    }

    /// Every scheme, workspace schemes first, then each project's.
    pub fn schemes(&self) -> impl Iterator<Item = &Scheme> + '_ {
        self.workspace_schemes
            .iter()
            .chain(self.projects.iter().flat_map(|p| &p.schemes))
    }

    /// Code coverage of the generated workspace schemes, if configured.
    #[must_use]
    pub fn code_coverage_mode(&self) -> Option<&CodeCoverageMode> {
        self.code_coverage_mode.as_ref()
    }

    /// Looks up a project by path.
    #[must_use]
    pub fn project(&self, path: &Path) -> Option<&Project> {
        self.projects.iter().find(|p| p.path == path)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node ids, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// The node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    /// Looks up the id of a node.
    #[must_use]
    pub fn node_id(&self, node: &GraphNode) -> Option<NodeId> {
        self.node_ids.get(node).copied()
    }

    /// Looks up the node of the target `name` in the project at `path`.
    #[must_use]
    pub fn target_id(&self, path: &Path, name: &str) -> Option<NodeId> {
        self.node_id(&GraphNode::Target {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// The project and target behind a target node.
    #[must_use]
    pub fn target(&self, id: NodeId) -> Option<(&Project, &Target)> {
        let &(p, t) = self.node_targets.get(&id)?;
        let project = &self.projects[p];
        Some((project, &project.targets[t]))
    }

    /// Direct dependencies of a node, in declaration order.
    #[must_use]
    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        self.forward.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Nodes depending directly on a node.
    #[must_use]
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        self.reverse.get(id.index()).map_or(&[], Vec::as_slice)
    }

    fn add_node(&mut self, node: GraphNode) -> NodeId {
        if let Some(&id) = self.node_ids.get(&node) {
            return id;
        }
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node.clone());
        self.node_ids.insert(node, id);
        self.forward.push(Vec::new());
        self.reverse.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let targets = &mut self.forward[from.index()];
        if targets.contains(&to) {
            return;
        }
        targets.push(to);
        self.reverse[to.index()].push(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Platform, Product};

    fn app_project() -> Project {
        Project::new("/App", "App")
            .with_target(
                Target::new("App", Platform::Ios, Product::App)
                    .with_dependency(TargetDependency::target("Core"))
                    .with_dependency(TargetDependency::target("Core"))
                    .with_dependency(TargetDependency::project("Shared", "/Shared"))
                    .with_dependency(TargetDependency::library("/libs/libssl.a")),
            )
            .with_target(Target::new("Core", Platform::Ios, Product::Framework))
    }

    fn shared_project() -> Project {
        Project::new("/Shared", "Shared").with_target(Target::new(
            "Shared",
            Platform::Ios,
            Product::StaticFramework,
        ))
    }

    #[test]
    fn every_target_becomes_a_node() {
        let graph = Graph::builder()
            .project(app_project())
            .project(shared_project())
            .build()
            .unwrap();

        assert!(graph.target_id(Path::new("/App"), "App").is_some());
        assert!(graph.target_id(Path::new("/App"), "Core").is_some());
        assert!(graph.target_id(Path::new("/Shared"), "Shared").is_some());
    }

    #[test]
    fn duplicate_edges_are_collapsed() {
        let graph = Graph::builder()
            .project(app_project())
            .project(shared_project())
            .build()
            .unwrap();

        let app = graph.target_id(Path::new("/App"), "App").unwrap();
        let names: Vec<String> = graph
            .dependencies(app)
            .iter()
            .map(|&id| graph.node(id).name())
            .collect();
        assert_eq!(names, vec!["Core", "Shared", "libssl"]);

        let core = graph.target_id(Path::new("/App"), "Core").unwrap();
        assert_eq!(graph.dependents(core), &[app]);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let err = Graph::builder().project(app_project()).build().unwrap_err();
        assert!(matches!(err, GraphError::UnknownTarget { ref name, .. } if name == "Shared"));
    }

    #[test]
    fn duplicate_target_is_rejected() {
        let project = Project::new("/P", "P")
            .with_target(Target::new("A", Platform::Ios, Product::App))
            .with_target(Target::new("A", Platform::Ios, Product::Framework));
        let err = Graph::builder().project(project).build().unwrap_err();
        assert!(matches!(err, GraphError::DuplicateTarget { .. }));
    }

    #[test]
    fn artifact_names_use_file_stem() {
        let node = GraphNode::Library {
            path: PathBuf::from("/path/to/library"),
            linking: Linking::Static,
        };
        assert_eq!(node.name(), "library");
        assert!(node.is_static_artifact());
        assert_eq!(node.kind_label(), "Library");
    }

    #[test]
    fn loads_graph_from_json() {
        let graph = Graph::from_json(
            r#"{
                "name": "Workspace",
                "projects": [{
                    "path": "/App",
                    "name": "App",
                    "targets": [
                        {"name": "App", "platform": "iOS", "product": "app",
                         "bundle_id": "dev.app",
                         "dependencies": [{"kind": "package", "product": "Logging"}]}
                    ]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.name(), "Workspace");
        let app = graph.target_id(Path::new("/App"), "App").unwrap();
        let dependency = graph.node(graph.dependencies(app)[0]);
        assert_eq!(
            dependency,
            &GraphNode::Package {
                product: "Logging".to_string(),
                path: PathBuf::from("/App"),
                linking: Linking::Static,
            }
        );
    }

    #[test]
    fn loads_workspace_schemes_and_coverage_mode() {
        let graph = Graph::from_json(
            r#"{
                "workspace_schemes": [{
                    "name": "All",
                    "run_target": {"project_path": "/App", "name": "App"},
                    "run_file_path": "/usr/bin/tool"
                }],
                "code_coverage_mode": {
                    "mode": "targets",
                    "targets": [{"project_path": "/App", "name": "App"}]
                },
                "projects": [{
                    "path": "/App",
                    "name": "App",
                    "schemes": [{"name": "App", "code_coverage": true}]
                }]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = graph.schemes().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["All", "App"]);
        assert_eq!(
            graph.workspace_schemes()[0].run_file_path.as_deref(),
            Some(Path::new("/usr/bin/tool"))
        );
        assert_eq!(
            graph.code_coverage_mode(),
            Some(&CodeCoverageMode::Targets {
                targets: vec![crate::model::TargetReference::new("/App", "App")],
            })
        );

        let all = Graph::from_json(r#"{"code_coverage_mode": {"mode": "all"}}"#).unwrap();
        assert_eq!(all.code_coverage_mode(), Some(&CodeCoverageMode::All));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Graph::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }
}
