//! Thumbnail loader - preview blobs re-encoded as base64 text

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{ByMessage, IndexLoader};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::store::schema;
use crate::store::Snapshot;

pub struct ThumbnailLoader;

impl IndexLoader for ThumbnailLoader {
    type Index = ByMessage<String>;

    fn name(&self) -> &'static str {
        "thumbnails"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_THUMBNAIL]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot
            .conn()
            .prepare("SELECT message_row_id, thumbnail FROM message_thumbnail")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<Vec<u8>>>(1)?))
        })?;

        let mut thumbnails = ByMessage::new();
        for row in rows {
            let (message_id, blob) = row?;
            if let Some(blob) = blob.filter(|b| !b.is_empty()) {
                thumbnails.insert(message_id, STANDARD.encode(blob));
            }
        }
        Ok(thumbnails)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}
