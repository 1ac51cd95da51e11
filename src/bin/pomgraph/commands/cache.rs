//! `pomgraph cache` command
//!
//! Inspect or clear the workspace data stored under `.pomgraph/`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::{CacheArgs, CacheCommands};
use pomgraph::ops::clean_cache;
use pomgraph::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: CacheArgs) -> Result<()> {
    match args.command {
        CacheCommands::Path => {
            println!("{}", ctx.cache_dir().display());
            Ok(())
        }
        CacheCommands::List => list_cache(&ctx.cache_dir()),
        CacheCommands::Clean => {
            let cache_dir = ctx.cache_dir();
            let existed = cache_dir.exists();
            clean_cache(ctx)?;
            if existed {
                eprintln!("     Removed {}", cache_dir.display());
            } else {
                eprintln!("     Nothing to clean");
            }
            Ok(())
        }
    }
}

/// List stored workspace data files with their sizes.
fn list_cache(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("(empty)");
        return Ok(());
    }

    let mut entries: Vec<_> = fs::read_dir(cache_dir)
        .with_context(|| format!("failed to read directory: {}", cache_dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();

    entries.sort_by_key(|e| e.file_name());

    if entries.is_empty() {
        println!("(empty)");
        return Ok(());
    }

    for entry in entries {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        println!("{} ({})", entry.file_name().to_string_lossy(), format_size(size));
    }

    Ok(())
}

/// Format a byte count for display.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
