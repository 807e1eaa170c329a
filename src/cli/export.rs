//! Export command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{load_contacts, resolve_snapshot};
use crate::archive::ArchiveBuilder;
use crate::config::Config;

pub struct ExportArgs {
    pub snapshot: Option<PathBuf>,
    pub contacts: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

pub fn run(config: &Config, args: ExportArgs) -> Result<()> {
    let snapshot = resolve_snapshot(args.snapshot, config)?;
    let contacts = load_contacts(args.contacts, config)?;
    let output = args.output.unwrap_or_else(|| config.output_path());
    let pretty = config.output.pretty && !args.compact;

    let archive = ArchiveBuilder::new(&contacts)
        .build(&snapshot)
        .with_context(|| format!("Failed to build archive from {}", snapshot.display()))?;

    archive
        .write_to(&output, pretty)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Exported {} chats, {} messages to {}",
        archive.total_chats,
        archive.total_messages,
        output.display()
    );
    Ok(())
}
