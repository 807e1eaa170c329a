//! Call log loader
//!
//! Calls hang off an identifier row-id, not a message, and are attached to
//! the chat of that identifier.

use super::{push_grouped, CallIndex, IndexLoader};
use crate::codes::CallResult;
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::{ms_to_iso, CallLogEntry};
use crate::store::schema;
use crate::store::Snapshot;

pub struct CallLoader;

impl IndexLoader for CallLoader {
    type Index = CallIndex;

    fn name(&self) -> &'static str {
        "calls"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::CALL_LOG]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT jid_row_id, from_me, call_id, timestamp, video_call,
                      duration, call_result, bytes_transferred
               FROM call_log
               ORDER BY _id"#,
        )?;

        let rows = stmt.query_map([], |row| {
            let jid_row_id: Option<i64> = row.get(0)?;
            let entry = CallLogEntry {
                call_id: row.get(2)?,
                timestamp: ms_to_iso(row.get(3)?),
                from_me: row.get::<_, Option<bool>>(1)?.unwrap_or(false),
                video_call: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
                duration_seconds: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
                result: CallResult::from_code(row.get::<_, Option<i64>>(6)?.unwrap_or(0)),
                bytes_transferred: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
            };
            Ok((jid_row_id, entry))
        })?;

        let mut calls = CallIndex::new();
        for row in rows {
            if let (Some(jid_row_id), entry) = row? {
                push_grouped(&mut calls, jid_row_id, entry);
            }
        }
        Ok(calls)
    }

    fn count(index: &Self::Index) -> usize {
        index.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::empty_snapshot;

    #[test]
    fn test_maps_call_results() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO call_log VALUES (1, 7, 0, 'CALL-1', 1700000000000, 0, 0, 2, NULL);
                 INSERT INTO call_log VALUES (2, 7, 1, 'CALL-2', 1700000100000, 1, 65, 99, 1048576);
                 INSERT INTO call_log VALUES (3, 8, 1, 'CALL-3', 1700000200000, 0, NULL, 5, 0);",
            )
            .unwrap();

        let calls = CallLoader
            .load(&snapshot, &IdentifierIndex::default())
            .unwrap();
        assert_eq!(CallLoader::count(&calls), 3);

        let by_seven = &calls[&7];
        assert_eq!(by_seven.len(), 2);
        assert_eq!(by_seven[0].result.as_str(), "missed");
        assert_eq!(by_seven[0].bytes_transferred, 0);
        assert!(!by_seven[0].from_me);
        assert_eq!(by_seven[1].result.as_str(), "result_99");
        assert!(by_seven[1].video_call);
        assert_eq!(by_seven[1].duration_seconds, 65);

        assert_eq!(calls[&8][0].result, CallResult::Answered);
        assert_eq!(calls[&8][0].duration_seconds, 0);
    }
}
