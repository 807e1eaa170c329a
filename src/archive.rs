//! Archive construction
//!
//! Pipeline, in dependency order:
//!   1. identifier index over `jid`
//!   2. auxiliary indexes (reactions, quotes, media, edits, polls,
//!      thumbnails, calls, participants)
//!   3. message assembly
//!   4. chat aggregation
//!
//! Each build is a pure function of the snapshot and the contacts mapping,
//! apart from `exported_at`.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::assemble::assemble_messages;
use crate::chats::aggregate_chats;
use crate::contacts::Contacts;
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::loaders::{ChatAttachments, MessageAttachments};
use crate::model::Archive;
use crate::store::Snapshot;

pub struct ArchiveBuilder<'a> {
    contacts: &'a Contacts,
    exported_at: Option<DateTime<Utc>>,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(contacts: &'a Contacts) -> Self {
        Self {
            contacts,
            exported_at: None,
        }
    }

    /// Pin the export timestamp instead of using the current time
    pub fn exported_at(mut self, at: DateTime<Utc>) -> Self {
        self.exported_at = Some(at);
        self
    }

    /// Open the snapshot at `path` and build the archive
    pub fn build(&self, path: &Path) -> Result<Archive> {
        let snapshot = Snapshot::open(path)?;
        self.build_from(&snapshot)
    }

    pub fn build_from(&self, snapshot: &Snapshot) -> Result<Archive> {
        snapshot.require_tables()?;
        info!(
            source = snapshot.source_name(),
            contacts = self.contacts.len(),
            "building archive"
        );

        let ids = IdentifierIndex::load(snapshot)?;
        info!(identifiers = ids.len(), "identifier index loaded");

        let message_attachments = MessageAttachments::load(snapshot, &ids)?;
        let chat_attachments = ChatAttachments::load(snapshot, &ids)?;

        let messages = assemble_messages(snapshot, &ids, message_attachments, self.contacts)?;
        info!(
            messages = messages.values().map(Vec::len).sum::<usize>(),
            chats = messages.len(),
            "messages assembled"
        );

        let chats = aggregate_chats(snapshot, &ids, messages, &chat_attachments)?;
        let total_messages: usize = chats.iter().map(|c| c.message_count).sum();
        info!(chats = chats.len(), total_messages, "chats aggregated");

        let exported_at = self.exported_at.unwrap_or_else(Utc::now);

        Ok(Archive {
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            source_db: snapshot.source_name().to_string(),
            total_chats: chats.len(),
            total_messages,
            contacts_count: self.contacts.len(),
            chats,
        })
    }
}

/// Build an archive stamped with the current time
pub fn build_archive(path: &Path, contacts: &Contacts) -> Result<Archive> {
    ArchiveBuilder::new(contacts).build(path)
}

impl Archive {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the archive to `path`.
    ///
    /// Output goes to a sibling `.tmp` file that is renamed into place, so a
    /// failed write never leaves a truncated archive behind.
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = self.to_json(pretty)?;
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        let written = fs::File::create(tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(tmp_path, path)) {
            let _ = fs::remove_file(tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;
    use crate::store::testing::{empty_snapshot, snapshot_with};
    use chrono::TimeZone;

    #[test]
    fn test_requires_core_tables() {
        let snapshot = snapshot_with("CREATE TABLE jid (_id INTEGER PRIMARY KEY, raw_string TEXT);");
        let contacts = Contacts::new();
        let err = ArchiveBuilder::new(&contacts)
            .build_from(&snapshot)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ArchiveError::RequiredSchemaMissing { table: "chat" }
        ));
    }

    #[test]
    fn test_empty_snapshot_builds_empty_archive() {
        let contacts: Contacts = [("+1", "A"), ("1", "A")].into_iter().collect();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let archive = ArchiveBuilder::new(&contacts)
            .exported_at(at)
            .build_from(&empty_snapshot())
            .unwrap();

        assert_eq!(archive.exported_at, "2026-01-02T03:04:05.000000+00:00");
        assert_eq!(archive.source_db, "msgstore.db");
        assert_eq!(archive.total_chats, 0);
        assert_eq!(archive.total_messages, 0);
        assert_eq!(archive.contacts_count, 2);
        assert!(archive.chats.is_empty());
    }

    #[test]
    fn test_write_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("archive.json");
        let contacts = Contacts::new();
        let archive = ArchiveBuilder::new(&contacts)
            .build_from(&empty_snapshot())
            .unwrap();

        archive.write_to(&path, false).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_chats"], 0);
        assert!(!dir.path().join("out").join("archive.json.tmp").exists());
    }
}
