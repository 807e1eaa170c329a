//! Media metadata loader
//!
//! Older snapshots fill `file_length` instead of `file_size`; the size falls
//! back to it. Zero durations and dimensions mean "not recorded".

use super::{ByMessage, IndexLoader};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::Media;
use crate::store::schema;
use crate::store::Snapshot;

pub struct MediaLoader;

fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

impl IndexLoader for MediaLoader {
    type Index = ByMessage<Media>;

    fn name(&self) -> &'static str {
        "media"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_MEDIA]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT message_row_id, mime_type, file_path, file_size, file_length,
                      media_duration, media_caption, width, height, media_name, file_hash
               FROM message_media"#,
        )?;

        let rows = stmt.query_map([], |row| {
            let message_id: i64 = row.get(0)?;
            let file_size: Option<i64> = row.get(3)?;
            let file_length: Option<i64> = row.get(4)?;

            let media = Media {
                mime_type: row.get(1)?,
                file_path: row.get(2)?,
                file_size: non_zero(file_size).or(file_length),
                duration_seconds: non_zero(row.get(5)?),
                caption: row.get(6)?,
                width: non_zero(row.get(7)?),
                height: non_zero(row.get(8)?),
                file_name: row.get(9)?,
                file_hash: row.get(10)?,
            };
            Ok((message_id, media))
        })?;

        rows.collect::<std::result::Result<_, _>>().map_err(Into::into)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}
