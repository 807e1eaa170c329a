//! Edit history loader

use super::{ByMessage, IndexLoader};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::{ms_to_iso, Edit};
use crate::store::schema;
use crate::store::Snapshot;

pub struct EditLoader;

impl IndexLoader for EditLoader {
    type Index = ByMessage<Edit>;

    fn name(&self) -> &'static str {
        "edits"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_EDIT_INFO]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT message_row_id, original_key_id, edited_timestamp, sender_timestamp
               FROM message_edit_info"#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Edit {
                    original_key_id: row.get(1)?,
                    edited_at: ms_to_iso(row.get(2)?),
                    sender_timestamp: ms_to_iso(row.get(3)?),
                },
            ))
        })?;

        rows.collect::<std::result::Result<_, _>>().map_err(Into::into)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}
