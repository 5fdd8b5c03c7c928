use crate::graph::dag::DependencyGraph;
use petgraph::visit::EdgeRef;

/// Output format for graph visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

/// Render the dependency graph. Optional references are drawn dashed.
pub fn visualize(graph: &DependencyGraph, format: GraphFormat) -> String {
    match format {
        GraphFormat::Mermaid => generate_mermaid(graph),
        GraphFormat::Dot => generate_dot(graph),
    }
}

fn generate_mermaid(graph: &DependencyGraph) -> String {
    let mut output = String::from("graph TD\n");

    for node in graph.graph.node_indices() {
        let name = graph.table_name(node);
        output.push_str(&format!("    {}[{}]\n", name, name));
    }

    output.push('\n');

    for edge in graph.graph.edge_references() {
        let from = graph.table_name(edge.source());
        let to = graph.table_name(edge.target());
        let label = edge.weight().columns.join(", ");
        let arrow = if edge.weight().is_nullable { "-.->" } else { "-->" };
        output.push_str(&format!("    {} {}|{}| {}\n", from, arrow, label, to));
    }

    output
}

fn generate_dot(graph: &DependencyGraph) -> String {
    let mut output = String::from("digraph dependencies {\n");
    output.push_str("    rankdir=TB;\n");
    output.push_str("    node [shape=box, style=rounded];\n\n");

    for node in graph.graph.node_indices() {
        output.push_str(&format!("    \"{}\";\n", graph.table_name(node)));
    }

    for edge in graph.graph.edge_references() {
        let from = graph.table_name(edge.source());
        let to = graph.table_name(edge.target());
        let label = edge.weight().columns.join(", ");
        let style = if edge.weight().is_nullable {
            ", style=dashed"
        } else {
            ""
        };
        output.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\"{}];\n",
            from, to, label, style
        ));
    }

    output.push_str("}\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::TableName;

    #[test]
    fn test_mermaid_output() {
        let graph = DependencyGraph::from_tables(&[TableName::Customers, TableName::Subscriptions]);
        let output = visualize(&graph, GraphFormat::Mermaid);

        assert!(output.contains("graph TD"));
        assert!(output.contains("subscriptions -->|customer_id| customers"));
    }

    #[test]
    fn test_dot_marks_optional_references() {
        let graph = DependencyGraph::from_tables(&[TableName::Technicians, TableName::VehicleFleet]);
        let output = visualize(&graph, GraphFormat::Dot);

        assert!(output.starts_with("digraph dependencies {"));
        assert!(output.contains(
            "\"vehicle_fleet\" -> \"technicians\" [label=\"assigned_technician_id\", style=dashed];"
        ));
    }
}
