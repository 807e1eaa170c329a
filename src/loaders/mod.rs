//! Auxiliary entity loaders
//!
//! Each loader scans one table group of the snapshot once and materializes
//! a typed index keyed by message row-id, identifier row-id or group
//! identifier. Loaders are independent of each other; they only need the
//! identifier index to turn row-ids into identifier strings.
//!
//! Auxiliary tables vary across app versions. A loader whose tables are
//! absent, or whose columns have drifted, yields an empty index instead of
//! failing the export.

mod calls;
mod edits;
mod media;
mod participants;
mod polls;
mod quotes;
mod reactions;
mod thumbnails;

pub use calls::CallLoader;
pub use edits::EditLoader;
pub use media::MediaLoader;
pub use participants::ParticipantLoader;
pub use polls::PollLoader;
pub use quotes::QuoteLoader;
pub use reactions::ReactionLoader;
pub use thumbnails::ThumbnailLoader;

use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::{ArchiveError, Result};
use crate::identity::IdentifierIndex;
use crate::model::{CallLogEntry, Edit, Media, Participant, Poll, Quote, Reaction};
use crate::store::{is_schema_drift, Snapshot};

/// At most one record per message row-id
pub type ByMessage<T> = HashMap<i64, T>;

/// Zero or more records per message row-id, in scan order
pub type ManyByMessage<T> = HashMap<i64, Vec<T>>;

/// Call history keyed by identifier row-id
pub type CallIndex = HashMap<i64, Vec<CallLogEntry>>;

/// Group members keyed by group identifier
pub type ParticipantIndex = HashMap<String, Vec<Participant>>;

/// A single-scan index builder over one auxiliary table group
pub trait IndexLoader {
    type Index: Default;

    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Every table the scan touches
    fn tables(&self) -> &'static [&'static str];

    /// Perform the scan. Callers go through [`load_optional`].
    fn load(&self, snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self::Index>;

    /// Number of records in a built index, for progress logging
    fn count(index: &Self::Index) -> usize;
}

/// Run a loader, substituting an empty index when its schema is missing
pub fn load_optional<L: IndexLoader>(
    loader: &L,
    snapshot: &Snapshot,
    ids: &IdentifierIndex,
) -> Result<L::Index> {
    for table in loader.tables() {
        if !snapshot.table_exists(table)? {
            warn!(loader = loader.name(), table = *table, "table missing, skipping");
            return Ok(Default::default());
        }
    }

    match loader.load(snapshot, ids) {
        Ok(index) => {
            info!(loader = loader.name(), records = L::count(&index), "loaded");
            Ok(index)
        }
        Err(ArchiveError::Database(e)) if is_schema_drift(&e) => {
            warn!(loader = loader.name(), error = %e, "unexpected schema, skipping");
            Ok(Default::default())
        }
        Err(e) => Err(e),
    }
}

/// Indexes joined against individual messages
#[derive(Debug, Default)]
pub struct MessageAttachments {
    pub reactions: ManyByMessage<Reaction>,
    pub quotes: ByMessage<Quote>,
    pub media: ByMessage<Media>,
    pub edits: ByMessage<Edit>,
    pub polls: ByMessage<Poll>,
    pub thumbnails: ByMessage<String>,
}

/// Indexes joined against chats
#[derive(Debug, Default)]
pub struct ChatAttachments {
    pub calls: CallIndex,
    pub participants: ParticipantIndex,
}

impl MessageAttachments {
    pub fn load(snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self> {
        Ok(Self {
            reactions: load_optional(&ReactionLoader, snapshot, ids)?,
            quotes: load_optional(&QuoteLoader, snapshot, ids)?,
            media: load_optional(&MediaLoader, snapshot, ids)?,
            edits: load_optional(&EditLoader, snapshot, ids)?,
            polls: load_optional(&PollLoader, snapshot, ids)?,
            thumbnails: load_optional(&ThumbnailLoader, snapshot, ids)?,
        })
    }
}

impl ChatAttachments {
    pub fn load(snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self> {
        Ok(Self {
            calls: load_optional(&CallLoader, snapshot, ids)?,
            participants: load_optional(&ParticipantLoader, snapshot, ids)?,
        })
    }
}

/// Push `value` onto the list kept under `key`
fn push_grouped<K: std::hash::Hash + Eq, V>(map: &mut HashMap<K, Vec<V>>, key: K, value: V) {
    map.entry(key).or_default().push(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{empty_snapshot, snapshot_with};

    #[test]
    fn test_missing_table_yields_empty_index() {
        let snapshot = snapshot_with("CREATE TABLE jid (_id INTEGER PRIMARY KEY, raw_string TEXT);");
        let ids = IdentifierIndex::default();

        let attachments = MessageAttachments::load(&snapshot, &ids).unwrap();
        assert!(attachments.reactions.is_empty());
        assert!(attachments.polls.is_empty());

        let chat_attachments = ChatAttachments::load(&snapshot, &ids).unwrap();
        assert!(chat_attachments.calls.is_empty());
        assert!(chat_attachments.participants.is_empty());
    }

    #[test]
    fn test_drifted_columns_yield_empty_index() {
        // call_log exists but predates the call_result column
        let snapshot = snapshot_with(
            "CREATE TABLE call_log (_id INTEGER PRIMARY KEY, jid_row_id INTEGER, timestamp INTEGER);
             INSERT INTO call_log VALUES (1, 2, 1700000000000);",
        );
        let calls = load_optional(&CallLoader, &snapshot, &IdentifierIndex::default()).unwrap();
        assert!(calls.is_empty());
    }

    #[test]
    fn test_empty_tables_yield_empty_indexes() {
        let snapshot = empty_snapshot();
        let ids = IdentifierIndex::default();
        let attachments = MessageAttachments::load(&snapshot, &ids).unwrap();
        assert!(attachments.quotes.is_empty());
        assert!(attachments.media.is_empty());
        assert!(attachments.edits.is_empty());
        assert!(attachments.thumbnails.is_empty());
    }
}
