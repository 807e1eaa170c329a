//! Quoted (replied-to) message loader

use super::{ByMessage, IndexLoader};
use crate::codes::MessageType;
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::Quote;
use crate::store::schema;
use crate::store::Snapshot;

pub struct QuoteLoader;

impl IndexLoader for QuoteLoader {
    type Index = ByMessage<Quote>;

    fn name(&self) -> &'static str {
        "quotes"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_QUOTED]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT message_row_id, from_me, sender_jid_row_id, key_id,
                      message_type, text_data
               FROM message_quoted"#,
        )?;

        let rows = stmt.query_map([], |row| {
            let message_id: i64 = row.get(0)?;
            let quote = Quote {
                from_me: row.get::<_, Option<bool>>(1)?.unwrap_or(false),
                sender_jid_row_id: row.get(2)?,
                key_id: row.get(3)?,
                message_type: MessageType::from_column(row.get(4)?),
                text: row.get(5)?,
            };
            Ok((message_id, quote))
        })?;

        rows.collect::<std::result::Result<_, _>>().map_err(Into::into)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::empty_snapshot;

    #[test]
    fn test_loads_one_quote_per_message() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO message_quoted VALUES (20, 1, NULL, 'KEY-A', 0, 'original text');
                 INSERT INTO message_quoted VALUES (21, 0, 3, 'KEY-B', 1, NULL);",
            )
            .unwrap();

        let quotes = QuoteLoader
            .load(&snapshot, &IdentifierIndex::default())
            .unwrap();
        assert_eq!(quotes.len(), 2);

        let first = &quotes[&20];
        assert!(first.from_me);
        assert_eq!(first.key_id.as_deref(), Some("KEY-A"));
        assert_eq!(first.message_type, MessageType::Text);
        assert_eq!(first.text.as_deref(), Some("original text"));

        let second = &quotes[&21];
        assert!(!second.from_me);
        assert_eq!(second.sender_jid_row_id, Some(3));
        assert_eq!(second.message_type, MessageType::Image);
        assert_eq!(second.text, None);
    }

    #[test]
    fn test_null_quoted_type_is_unknown() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch("INSERT INTO message_quoted VALUES (22, 0, NULL, 'KEY-C', NULL, 'hm');")
            .unwrap();

        let quotes = QuoteLoader
            .load(&snapshot, &IdentifierIndex::default())
            .unwrap();
        assert_eq!(quotes[&22].message_type.as_str(), "unknown");
    }
}
