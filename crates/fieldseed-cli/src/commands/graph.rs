use anyhow::Result;

use fieldseed_core::graph::dag::DependencyGraph;
use fieldseed_core::graph::topo::topological_sort;
use fieldseed_core::graph::visualize::{self, GraphFormat as VizFormat};

use crate::args::GraphArgs;

pub fn run(args: &GraphArgs) -> Result<()> {
    let dep_graph = DependencyGraph::full();
    let order = topological_sort(&dep_graph)?;
    tracing::debug!(
        "{} tables, {} references, order: {:?}",
        dep_graph.table_count(),
        dep_graph.edge_count(),
        order
    );

    let format = match args.format {
        crate::args::GraphFormat::Mermaid => VizFormat::Mermaid,
        crate::args::GraphFormat::Dot => VizFormat::Dot,
    };

    let output = visualize::visualize(&dep_graph, format);
    println!("{}", output);

    Ok(())
}
