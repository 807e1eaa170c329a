//! Message assembly
//!
//! One ordered pass over the `message` table. Each row becomes a
//! [`Message`] carrying whatever the auxiliary indexes hold for its id.

use std::collections::HashMap;

use crate::codes::{DeliveryStatus, MessageType};
use crate::contacts::Contacts;
use crate::error::Result;
use crate::identity::{resolve_display_name, IdentifierIndex};
use crate::loaders::MessageAttachments;
use crate::model::{ms_to_iso, Message};
use crate::store::Snapshot;

/// Row `_id = 1` of `message` is a placeholder the app inserts itself
const SENTINEL_MESSAGE_ID: i64 = 1;

/// Chronologically ordered messages keyed by chat row-id
pub type MessagesByChat = HashMap<i64, Vec<Message>>;

struct MessageRow {
    id: i64,
    chat_row_id: Option<i64>,
    from_me: bool,
    key_id: Option<String>,
    sender_jid_row_id: Option<i64>,
    status: i64,
    timestamp: Option<i64>,
    received_timestamp: Option<i64>,
    message_type: Option<i64>,
    text: Option<String>,
    starred: bool,
}

/// Build every message, consuming the per-message indexes.
///
/// Messages are ordered by timestamp, then row id. Rows with no chat
/// are skipped.
pub fn assemble_messages(
    snapshot: &Snapshot,
    ids: &IdentifierIndex,
    mut attachments: MessageAttachments,
    contacts: &Contacts,
) -> Result<MessagesByChat> {
    let mut stmt = snapshot.conn().prepare(
        r#"SELECT _id, chat_row_id, from_me, key_id, sender_jid_row_id, status,
                  timestamp, received_timestamp, message_type, text_data, starred
           FROM message
           WHERE _id != ?1
           ORDER BY timestamp ASC, _id ASC"#,
    )?;

    let rows = stmt.query_map([SENTINEL_MESSAGE_ID], |row| {
        Ok(MessageRow {
            id: row.get(0)?,
            chat_row_id: row.get(1)?,
            from_me: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
            key_id: row.get(3)?,
            sender_jid_row_id: row.get(4)?,
            status: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            timestamp: row.get(6)?,
            received_timestamp: row.get(7)?,
            message_type: row.get(8)?,
            text: row.get(9)?,
            starred: row.get::<_, Option<bool>>(10)?.unwrap_or(false),
        })
    })?;

    let mut by_chat = MessagesByChat::new();
    for row in rows {
        let row = row?;
        let Some(chat_row_id) = row.chat_row_id else {
            continue;
        };
        let message = build_message(row, ids, &mut attachments, contacts);
        by_chat.entry(chat_row_id).or_default().push(message);
    }

    Ok(by_chat)
}

fn build_message(
    row: MessageRow,
    ids: &IdentifierIndex,
    attachments: &mut MessageAttachments,
    contacts: &Contacts,
) -> Message {
    let sender_jid = row
        .sender_jid_row_id
        .filter(|id| *id > 0)
        .and_then(|id| ids.get(id))
        .map(str::to_string);

    // Only names that came from the contacts mapping are exposed
    let sender_name = sender_jid.as_deref().and_then(|jid| {
        let (name, found) = resolve_display_name(jid, contacts);
        found.then_some(name)
    });

    let id = row.id;
    Message {
        id,
        key_id: row.key_id,
        from_me: row.from_me,
        timestamp: ms_to_iso(row.timestamp),
        timestamp_ms: row.timestamp,
        message_type: MessageType::from_column(row.message_type),
        text: row.text,
        status: DeliveryStatus::from_code(row.status),
        starred: row.starred,
        sender_jid,
        sender_name,
        received_timestamp: ms_to_iso(row.received_timestamp),
        reply_to: attachments.quotes.remove(&id),
        reactions: attachments.reactions.remove(&id),
        media: attachments.media.remove(&id),
        edited: attachments.edits.remove(&id),
        poll: attachments.polls.remove(&id),
        thumbnail: attachments.thumbnails.remove(&id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::MessageType;
    use crate::model::{Quote, Reaction};
    use crate::store::testing::empty_snapshot;

    fn fixture() -> (Snapshot, IdentifierIndex) {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO jid VALUES (2, '15551234567@s.whatsapp.net');
                 INSERT INTO jid VALUES (3, '15559876543@s.whatsapp.net');
                 -- sentinel row
                 INSERT INTO message VALUES (1, -1, 0, '-1', NULL, -1, 0, 0, -1, NULL, 0);
                 INSERT INTO message VALUES (10, 5, 0, 'K10', 2, 0, 1700000200000, 1700000201000, 0, 'later', 0);
                 INSERT INTO message VALUES (11, 5, 1, 'K11', NULL, 13, 1700000100000, 0, 2, NULL, 1);
                 INSERT INTO message VALUES (12, 6, 0, 'K12', 3, 77, -20, NULL, 555, 'odd', 0);
                 INSERT INTO message VALUES (13, NULL, 0, 'K13', NULL, 0, 1700000000000, NULL, 0, 'orphan', 0);",
            )
            .unwrap();
        let ids = IdentifierIndex::load(&snapshot).unwrap();
        (snapshot, ids)
    }

    #[test]
    fn test_orders_by_timestamp_and_skips_sentinel() {
        let (snapshot, ids) = fixture();
        let by_chat = assemble_messages(
            &snapshot,
            &ids,
            MessageAttachments::default(),
            &Contacts::new(),
        )
        .unwrap();

        assert!(!by_chat.contains_key(&-1));
        let chat: Vec<_> = by_chat[&5].iter().map(|m| m.id).collect();
        assert_eq!(chat, vec![11, 10]);
        assert_eq!(by_chat.values().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_plain_text_message_has_no_attachments() {
        let (snapshot, ids) = fixture();
        let by_chat = assemble_messages(
            &snapshot,
            &ids,
            MessageAttachments::default(),
            &Contacts::new(),
        )
        .unwrap();

        let message = &by_chat[&5][1];
        assert_eq!(message.message_type, MessageType::Text);
        assert_eq!(message.text.as_deref(), Some("later"));
        assert_eq!(message.status.as_str(), "received");
        assert_eq!(
            message.timestamp.as_deref(),
            Some("2023-11-14T22:16:40.000+00:00")
        );
        assert_eq!(message.timestamp_ms, Some(1_700_000_200_000));
        assert!(message.received_timestamp.is_some());
        assert!(message.reply_to.is_none());
        assert!(message.reactions.is_none());
        assert!(message.media.is_none());
        assert!(message.edited.is_none());
        assert!(message.poll.is_none());
        assert!(message.thumbnail.is_none());
    }

    #[test]
    fn test_unknown_codes_and_bad_timestamps() {
        let (snapshot, ids) = fixture();
        let by_chat = assemble_messages(
            &snapshot,
            &ids,
            MessageAttachments::default(),
            &Contacts::new(),
        )
        .unwrap();

        let message = &by_chat[&6][0];
        assert_eq!(message.message_type.as_str(), "unknown_555");
        assert_eq!(message.status.as_str(), "status_77");
        assert_eq!(message.timestamp, None);
        assert_eq!(message.received_timestamp, None);

        let outgoing = &by_chat[&5][0];
        assert!(outgoing.from_me && outgoing.starred);
        assert_eq!(outgoing.status.as_str(), "played");
        assert_eq!(outgoing.received_timestamp, None);
        assert_eq!(outgoing.sender_jid, None);
    }

    #[test]
    fn test_null_type_reported_as_unknown() {
        let (snapshot, ids) = fixture();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO message VALUES (14, 7, 0, 'K14', NULL, 0, 1700000300000, NULL, NULL, 'x', 0);",
            )
            .unwrap();
        let by_chat = assemble_messages(
            &snapshot,
            &ids,
            MessageAttachments::default(),
            &Contacts::new(),
        )
        .unwrap();

        let message = &by_chat[&7][0];
        assert_eq!(message.message_type, MessageType::Missing);
        assert_eq!(message.message_type.as_str(), "unknown");
    }

    #[test]
    fn test_sender_name_only_from_contacts() {
        let (snapshot, ids) = fixture();
        let contacts: Contacts = [("+15551234567", "Alice")].into_iter().collect();
        let by_chat =
            assemble_messages(&snapshot, &ids, MessageAttachments::default(), &contacts).unwrap();

        let known = &by_chat[&5][1];
        assert_eq!(known.sender_jid.as_deref(), Some("15551234567@s.whatsapp.net"));
        assert_eq!(known.sender_name.as_deref(), Some("Alice"));

        let unknown = &by_chat[&6][0];
        assert_eq!(unknown.sender_jid.as_deref(), Some("15559876543@s.whatsapp.net"));
        assert_eq!(unknown.sender_name, None);
    }

    #[test]
    fn test_attaches_indexed_records_by_message_id() {
        let (snapshot, ids) = fixture();
        let mut attachments = MessageAttachments::default();
        attachments.quotes.insert(
            10,
            Quote {
                from_me: true,
                sender_jid_row_id: None,
                key_id: Some("K11".to_string()),
                message_type: MessageType::Audio,
                text: None,
            },
        );
        attachments.reactions.insert(
            11,
            vec![Reaction {
                emoji: Some("🔥".to_string()),
                from: "15551234567@s.whatsapp.net".to_string(),
                timestamp: None,
            }],
        );
        attachments.thumbnails.insert(42, "unused".to_string());

        let by_chat = assemble_messages(&snapshot, &ids, attachments, &Contacts::new()).unwrap();

        let reply = &by_chat[&5][1];
        assert_eq!(reply.reply_to.as_ref().unwrap().key_id.as_deref(), Some("K11"));
        assert!(reply.reactions.is_none());

        let reacted = &by_chat[&5][0];
        assert_eq!(reacted.reactions.as_ref().unwrap().len(), 1);
        assert!(reacted.reply_to.is_none());
    }
}
