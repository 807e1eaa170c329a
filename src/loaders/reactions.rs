//! Reactions loader
//!
//! Reactions are add-on rows of type 56 joined with their emoji detail.

use rusqlite::params;

use super::{push_grouped, IndexLoader, ManyByMessage};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::{ms_to_iso, Reaction};
use crate::store::schema::{self, ADD_ON_REACTION};
use crate::store::Snapshot;

pub struct ReactionLoader;

impl IndexLoader for ReactionLoader {
    type Index = ManyByMessage<Reaction>;

    fn name(&self) -> &'static str {
        "reactions"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_ADD_ON, schema::MESSAGE_ADD_ON_REACTION]
    }

    fn load(&self, snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT ao.parent_message_row_id, ao.sender_jid_row_id,
                      ar.reaction, ar.sender_timestamp
               FROM message_add_on ao
               JOIN message_add_on_reaction ar ON ar.message_add_on_row_id = ao._id
               WHERE ao.message_add_on_type = ?1
               ORDER BY ao._id"#,
        )?;

        let rows = stmt.query_map(params![ADD_ON_REACTION], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut reactions = ManyByMessage::new();
        for row in rows {
            let (parent_id, sender_row_id, emoji, timestamp) = row?;
            let Some(parent_id) = parent_id else { continue };
            push_grouped(
                &mut reactions,
                parent_id,
                Reaction {
                    emoji,
                    from: ids.resolve_or_empty(sender_row_id),
                    timestamp: ms_to_iso(timestamp),
                },
            );
        }
        Ok(reactions)
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
    fn test_groups_reactions_by_parent() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO message_add_on VALUES (1, 10, 2, 56);
                 INSERT INTO message_add_on VALUES (2, 10, 3, 56);
                 INSERT INTO message_add_on VALUES (3, 11, 2, 56);
                 INSERT INTO message_add_on VALUES (4, 12, 2, 67);
                 INSERT INTO message_add_on_reaction VALUES (1, '👍', 1700000000000);
                 INSERT INTO message_add_on_reaction VALUES (2, '❤️', 0);
                 INSERT INTO message_add_on_reaction VALUES (3, '😂', 1700000001000);
                 INSERT INTO message_add_on_reaction VALUES (4, '🤔', 1700000002000);",
            )
            .unwrap();
        let ids = IdentifierIndex::from_rows(vec![(2, "15551234567@s.whatsapp.net".to_string())]);

        let reactions = ReactionLoader.load(&snapshot, &ids).unwrap();
        assert_eq!(ReactionLoader::count(&reactions), 3);

        let on_ten = &reactions[&10];
        assert_eq!(on_ten.len(), 2);
        assert_eq!(on_ten[0].emoji.as_deref(), Some("👍"));
        assert_eq!(on_ten[0].from, "15551234567@s.whatsapp.net");
        assert!(on_ten[0].timestamp.is_some());
        // unresolvable sender and zero timestamp
        assert_eq!(on_ten[1].from, "");
        assert_eq!(on_ten[1].timestamp, None);

        // add-on of another discriminator never becomes a reaction
        assert!(!reactions.contains_key(&12));
    }

    #[test]
    fn test_skips_reaction_without_parent() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO message_add_on VALUES (1, NULL, 2, 56);
                 INSERT INTO message_add_on VALUES (2, 10, 2, 56);
                 INSERT INTO message_add_on_reaction VALUES (1, '👍', 1700000000000);
                 INSERT INTO message_add_on_reaction VALUES (2, '🙏', 1700000001000);",
            )
            .unwrap();

        let reactions = ReactionLoader
            .load(&snapshot, &IdentifierIndex::default())
            .unwrap();
        assert_eq!(ReactionLoader::count(&reactions), 1);
        assert_eq!(reactions[&10][0].emoji.as_deref(), Some("🙏"));
    }
}
