use petgraph::algo::toposort;

use crate::error::{FieldSeedError, Result};
use crate::graph::dag::DependencyGraph;
use crate::schema::types::TableName;

/// Compute a topological sort of the dependency graph.
/// Returns tables in generation order (parents before children).
pub fn topological_sort(graph: &DependencyGraph) -> Result<Vec<TableName>> {
    // Edges go child → parent, so petgraph yields children first.
    match toposort(&graph.graph, None) {
        Ok(sorted_indices) => Ok(sorted_indices
            .iter()
            .rev()
            .map(|&idx| graph.table_name(idx))
            .collect()),
        Err(cycle_node) => Err(FieldSeedError::CircularDependency {
            table: graph.table_name(cycle_node.node_id()).to_string(),
        }),
    }
}

/// Verify that `order` generates every table after all of its parents.
///
/// A parent missing from `order` entirely is also a violation: nothing
/// would exist for the child to reference.
pub fn check_order(order: &[TableName]) -> Result<()> {
    let graph = DependencyGraph::from_tables(order);
    topological_sort(&graph)?;

    for (pos, table) in order.iter().enumerate() {
        for parent in table.parents() {
            if !order[..pos].contains(&parent) {
                return Err(FieldSeedError::DependencyOrder {
                    table: table.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }
    Ok(())
}
