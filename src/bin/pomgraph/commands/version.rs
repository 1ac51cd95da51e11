//! `pomgraph version` command

use anyhow::Result;

use crate::cli::VersionArgs;
use pomgraph::ops::{effective_version, LoadOptions};
use pomgraph::{GlobalContext, MavenEvaluator};

pub fn execute(ctx: &GlobalContext, args: VersionArgs, no_cache: bool) -> Result<()> {
    let version = effective_version(
        ctx,
        &LoadOptions { no_cache },
        &args.artifact_id,
        &MavenEvaluator,
    )?;

    println!("{}", version);
    Ok(())
}
