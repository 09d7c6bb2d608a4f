//! Order command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use xcgraph_lint::{Graph, GraphTraversal};

/// Runs the order command.
pub fn run(graph_path: &Path) -> Result<()> {
    let graph = Graph::from_file(graph_path)
        .with_context(|| format!("Failed to load graph: {}", graph_path.display()))?;
    for line in build_order(&graph) {
        println!("{line}");
    }
    Ok(())
}

/// Targets in dependency order, each as `<project>/<target>`.
fn build_order(graph: &Graph) -> Vec<String> {
    let traversal = GraphTraversal::new(graph);
    traversal
        .topological_order()
        .into_iter()
        .filter_map(|id| traversal.target(id))
        .map(|target| format!("{}/{}", target.project.name, target.name()))
        .collect()
}
