//! Command implementations

pub mod chats;
pub mod export;
pub mod schema;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::contacts::Contacts;

const PREFERRED_SNAPSHOT: &str = "msgstore.db";

/// Pick the snapshot to read: explicit flag, then config, then the data
/// directory.
pub fn resolve_snapshot(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = flag.or_else(|| config.snapshot_path()) {
        return Ok(path);
    }
    find_snapshot(&config.data_dir())
}

/// Search `data_dir` for `*.db`, preferring `msgstore.db`
pub fn find_snapshot(data_dir: &Path) -> Result<PathBuf> {
    let pattern = data_dir.join("*.db");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Non UTF-8 data directory: {}", data_dir.display()))?;

    let mut candidates: Vec<PathBuf> = glob::glob(pattern)
        .context("Invalid snapshot search pattern")?
        .filter_map(|entry| entry.ok())
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        bail!("No .db files found in {}", data_dir.display());
    }
    let preferred = candidates
        .iter()
        .position(|p| p.file_name().is_some_and(|n| n == PREFERRED_SNAPSHOT))
        .unwrap_or(0);
    let chosen = candidates.swap_remove(preferred);
    info!(path = %chosen.display(), "using snapshot");
    Ok(chosen)
}

/// Load the contacts mapping; a missing file yields an empty mapping
pub fn load_contacts(flag: Option<PathBuf>, config: &Config) -> Result<Contacts> {
    let path = flag.unwrap_or_else(|| config.contacts_path());
    if !path.is_file() {
        warn!(path = %path.display(), "contacts file not found, sender names disabled");
        return Ok(Contacts::new());
    }
    let contacts = Contacts::load(&path)
        .with_context(|| format!("Failed to load contacts from {}", path.display()))?;
    info!(contacts = contacts.len(), "contacts loaded");
    Ok(contacts)
}
