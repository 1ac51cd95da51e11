//! `pomgraph graph` command
//!
//! Prints the inferred nodes and edges as JSON on stdout.

use anyhow::Result;

use crate::cli::GraphArgs;
use pomgraph::ops::{infer_graph, LoadOptions};
use pomgraph::{GlobalContext, MavenEvaluator};

pub fn execute(ctx: &GlobalContext, args: GraphArgs, no_cache: bool) -> Result<()> {
    let opts = LoadOptions { no_cache };
    let graph = infer_graph(ctx, &opts, &MavenEvaluator)?;

    let json = if args.nodes_only {
        serde_json::to_string_pretty(&graph.nodes)?
    } else if args.edges_only {
        serde_json::to_string_pretty(&graph.edges)?
    } else {
        serde_json::to_string_pretty(&graph)?
    };

    println!("{}", json);
    Ok(())
}
