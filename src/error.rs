//! Error types for archive construction

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort an archive build.
///
/// Missing optional tables, malformed timestamps, unknown codes and orphan
/// poll votes are not errors: they are absorbed where they occur.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The snapshot file does not exist
    #[error("snapshot not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// One of the tables every archive needs is absent
    #[error("required table '{table}' is missing from the snapshot")]
    RequiredSchemaMissing { table: &'static str },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The contacts mapping file could not be parsed
    #[error("invalid contacts file {}: {source}", path.display())]
    Contacts {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
