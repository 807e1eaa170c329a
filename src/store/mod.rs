//! Read-only access to a decrypted msgstore snapshot

pub mod schema;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

use crate::error::{ArchiveError, Result};

pub use schema::SNAPSHOT_SCHEMA;

/// Presence of one expected table, as reported by [`Snapshot::table_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    pub name: &'static str,
    pub required: bool,
    pub present: bool,
}

/// An open snapshot database.
///
/// The connection is released when the value is dropped, on success and
/// error paths alike.
pub struct Snapshot {
    conn: Connection,
    source_name: String,
}

impl Snapshot {
    /// Open the snapshot at `path` in read-only mode
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ArchiveError::MissingSource(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self { conn, source_name })
    }

    /// Wrap an already-open connection (fixtures, in-memory databases)
    pub fn from_connection(conn: Connection, source_name: impl Into<String>) -> Self {
        Self {
            conn,
            source_name: source_name.into(),
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File name of the snapshot, recorded as `source_db` in the archive
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Fail with `RequiredSchemaMissing` unless jid, chat and message exist
    pub fn require_tables(&self) -> Result<()> {
        for table in schema::REQUIRED_TABLES {
            if !self.table_exists(table)? {
                return Err(ArchiveError::RequiredSchemaMissing { table });
            }
        }
        Ok(())
    }

    pub fn table_report(&self) -> Result<Vec<TableStatus>> {
        let mandatory = schema::REQUIRED_TABLES.iter().map(|t| (*t, true));
        let optional = schema::OPTIONAL_TABLES.iter().map(|t| (*t, false));

        mandatory
            .chain(optional)
            .map(|(name, required)| {
                Ok(TableStatus {
                    name,
                    required,
                    present: self.table_exists(name)?,
                })
            })
            .collect()
    }
}

/// True for errors caused by a table or column that this app version lacks
pub fn is_schema_drift(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => {
            msg.starts_with("no such table") || msg.starts_with("no such column")
        }
        _ => false,
    }
}
