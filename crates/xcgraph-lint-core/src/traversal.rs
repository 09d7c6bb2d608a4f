//! Read-only queries over a resolved [`Graph`].

use crate::graph::{Graph, NodeId};
use crate::model::{Product, Project, Target};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashSet};
use std::path::{Path, PathBuf};

/// A target node together with the project declaring it.
#[derive(Debug, Clone, Copy)]
pub struct GraphTarget<'g> {
    /// Node id of the target.
    pub id: NodeId,
    /// Project declaring the target.
    pub project: &'g Project,
    /// The target itself.
    pub target: &'g Target,
}

impl<'g> GraphTarget<'g> {
    /// Product type of the target.
    #[must_use]
    pub fn product(&self) -> Product {
        self.target.product
    }

    /// Target name.
    #[must_use]
    pub fn name(&self) -> &'g str {
        &self.target.name
    }
}

/// Traversal helpers borrowing a graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphTraversal<'g> {
    graph: &'g Graph,
}

impl<'g> GraphTraversal<'g> {
    /// Creates a traversal over `graph`.
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The target behind `id`, if `id` is a target node.
    #[must_use]
    pub fn target(&self, id: NodeId) -> Option<GraphTarget<'g>> {
        self.graph
            .target(id)
            .map(|(project, target)| GraphTarget { id, project, target })
    }

    /// Looks up a target by project path and name.
    #[must_use]
    pub fn find_target(&self, path: &Path, name: &str) -> Option<GraphTarget<'g>> {
        self.graph
            .target_id(path, name)
            .and_then(|id| self.target(id))
    }

    /// Every target, ordered by project path then target name.
    #[must_use]
    pub fn all_targets(&self) -> Vec<GraphTarget<'g>> {
        let mut targets: Vec<GraphTarget<'g>> = self
            .graph
            .node_ids()
            .filter_map(|id| self.target(id))
            .collect();
        targets.sort_by(|a, b| {
            a.project
                .path
                .cmp(&b.project.path)
                .then_with(|| a.target.name.cmp(&b.target.name))
        });
        targets
    }

    /// Direct dependencies of a node, in declaration order.
    #[must_use]
    pub fn direct_dependencies(&self, id: NodeId) -> &'g [NodeId] {
        self.graph.dependencies(id)
    }

    /// Direct dependencies of a node that are targets.
    #[must_use]
    pub fn direct_target_dependencies(&self, id: NodeId) -> Vec<GraphTarget<'g>> {
        self.direct_dependencies(id)
            .iter()
            .filter_map(|&dep| self.target(dep))
            .collect()
    }

    /// Every node reachable from `id`, excluding `id`, in depth-first
    /// discovery order. Safe on cyclic input.
    #[must_use]
    pub fn transitive_dependencies(&self, id: NodeId) -> Vec<NodeId> {
        let mut visited = HashSet::from([id]);
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.direct_dependencies(id).iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            order.push(node);
            stack.extend(self.direct_dependencies(node).iter().rev().copied());
        }
        order
    }

    /// Every target reachable from `id`, excluding `id`.
    #[must_use]
    pub fn transitive_target_dependencies(&self, id: NodeId) -> Vec<GraphTarget<'g>> {
        self.transitive_dependencies(id)
            .into_iter()
            .filter_map(|dep| self.target(dep))
            .collect()
    }

    /// Returns true for an edge from a UI test bundle to the app that hosts it.
    ///
    /// UI tests drive their host from a separate runner process, so such an
    /// edge does not link anything into the test bundle.
    #[must_use]
    pub fn is_ui_test_host_edge(&self, from: NodeId, to: NodeId) -> bool {
        match (self.target(from), self.target(to)) {
            (Some(test), Some(host)) => {
                test.product() == Product::UiTests && host.product().can_host_tests()
            }
            _ => false,
        }
    }

    /// Direct dependencies that take part in linking `id`.
    ///
    /// Same as [`Self::direct_dependencies`] without the UI test host edge.
    #[must_use]
    pub fn linked_dependencies(&self, id: NodeId) -> Vec<NodeId> {
        self.direct_dependencies(id)
            .iter()
            .copied()
            .filter(|&dep| !self.is_ui_test_host_edge(id, dep))
            .collect()
    }

    /// Targets nothing links against, ordered by project path then name.
    ///
    /// An app only depended on by the UI tests it hosts is still an entry node.
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        self.all_targets()
            .into_iter()
            .filter(|t| {
                self.graph
                    .dependents(t.id)
                    .iter()
                    .all(|&from| self.is_ui_test_host_edge(from, t.id))
            })
            .map(|t| t.id)
            .collect()
    }

    /// The app-like target a test bundle depends on directly.
    #[must_use]
    pub fn host_app(&self, test: NodeId) -> Option<GraphTarget<'g>> {
        let target = self.target(test)?;
        if !target.product().is_test() {
            return None;
        }
        self.direct_target_dependencies(test)
            .into_iter()
            .find(|dep| dep.product().can_host_tests())
    }

    /// Returns true if `test` is a test bundle hosted by `app`.
    #[must_use]
    pub fn is_hosted_by(&self, test: NodeId, app: NodeId) -> bool {
        self.host_app(test).is_some_and(|host| host.id == app)
    }

    /// Projects listed by the workspace, or every project when none are listed.
    #[must_use]
    pub fn root_projects(&self) -> Vec<&'g Project> {
        let listed = self.graph.workspace_projects();
        if listed.is_empty() {
            return self.graph.projects().iter().collect();
        }
        listed
            .iter()
            .filter_map(|path| self.graph.project(path))
            .collect()
    }

    /// Paths of the other projects reached through the target dependencies
    /// of the project at `path`.
    #[must_use]
    pub fn project_dependencies(&self, path: &Path) -> BTreeSet<PathBuf> {
        let Some(project) = self.graph.project(path) else {
            return BTreeSet::new();
        };
        project
            .targets
            .iter()
            .filter_map(|t| self.graph.target_id(path, &t.name))
            .flat_map(|id| self.transitive_target_dependencies(id))
            .map(|dep| dep.project.path.clone())
            .filter(|dep_path| dep_path != path)
            .collect()
    }

    /// Nodes ordered so that every node comes after its dependencies.
    ///
    /// Ties are broken by node id. Nodes on a cycle cannot be ordered and
    /// are appended at the end in id order.
    #[must_use]
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut pending: Vec<usize> = self
            .graph
            .node_ids()
            .map(|id| self.direct_dependencies(id).len())
            .collect();
        let mut ready: BinaryHeap<Reverse<NodeId>> = self
            .graph
            .node_ids()
            .filter(|id| self.direct_dependencies(*id).is_empty())
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(pending.len());
        let mut placed = HashSet::new();
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            placed.insert(id);
            for &dependent in self.graph.dependents(id) {
                let count = &mut pending[dependent.0 as usize];
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        order.extend(self.graph.node_ids().filter(|id| !placed.contains(id)));
        order
    }
}
