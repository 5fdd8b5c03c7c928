use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::schema::types::TableName;

/// A directed graph of table dependencies.
/// Edges point from dependent table to referenced table (child → parent).
pub struct DependencyGraph {
    pub graph: DiGraph<TableName, EdgeInfo>,
    pub node_indices: HashMap<TableName, NodeIndex>,
}

/// The foreign-key columns one table holds into another.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub columns: Vec<&'static str>,
    /// True when every one of the columns may be empty.
    pub is_nullable: bool,
}

impl DependencyGraph {
    /// Build the graph over `tables`. References to tables outside the set
    /// are left out.
    pub fn from_tables(tables: &[TableName]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for &table in tables {
            node_indices
                .entry(table)
                .or_insert_with(|| graph.add_node(table));
        }

        for &table in tables {
            for parent in table.parents() {
                let (Some(&from_idx), Some(&to_idx)) =
                    (node_indices.get(&table), node_indices.get(&parent))
                else {
                    continue;
                };
                let references: Vec<_> = table
                    .references()
                    .iter()
                    .filter(|r| r.parent == parent)
                    .collect();
                graph.add_edge(
                    from_idx,
                    to_idx,
                    EdgeInfo {
                        columns: references.iter().map(|r| r.column).collect(),
                        is_nullable: references.iter().all(|r| r.nullable),
                    },
                );
            }
        }

        Self {
            graph,
            node_indices,
        }
    }

    /// The graph over every table.
    pub fn full() -> Self {
        Self::from_tables(&TableName::ALL)
    }

    pub fn table_name(&self, idx: NodeIndex) -> TableName {
        self.graph[idx]
    }

    pub fn node_index(&self, table: TableName) -> Option<NodeIndex> {
        self.node_indices.get(&table).copied()
    }

    pub fn table_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
