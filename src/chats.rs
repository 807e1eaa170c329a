//! Chat aggregation - one pass over `chat`, most recent activity first

use crate::assemble::MessagesByChat;
use crate::error::Result;
use crate::identity::{is_group, local_part, IdentifierIndex};
use crate::loaders::ChatAttachments;
use crate::model::{ms_to_iso, Chat, Message};
use crate::store::Snapshot;

struct ChatRow {
    id: i64,
    jid_row_id: Option<i64>,
    subject: Option<String>,
    group_type: Option<i64>,
    created_timestamp: Option<i64>,
    archived: bool,
    ephemeral_expiration: Option<i64>,
}

/// Build chat records, moving each chat's messages out of `messages`
pub fn aggregate_chats(
    snapshot: &Snapshot,
    ids: &IdentifierIndex,
    mut messages: MessagesByChat,
    attachments: &ChatAttachments,
) -> Result<Vec<Chat>> {
    let mut stmt = snapshot.conn().prepare(
        r#"SELECT _id, jid_row_id, subject, group_type, created_timestamp,
                  archived, ephemeral_expiration
           FROM chat
           ORDER BY sort_timestamp DESC, _id ASC"#,
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(ChatRow {
            id: row.get(0)?,
            jid_row_id: row.get(1)?,
            subject: row.get(2)?,
            group_type: row.get(3)?,
            created_timestamp: row.get(4)?,
            archived: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
            ephemeral_expiration: row.get(6)?,
        })
    })?;

    let mut chats = vec![];
    for row in rows {
        let row = row?;
        let chat_messages = messages.remove(&row.id).unwrap_or_default();
        chats.push(build_chat(row, ids, chat_messages, attachments));
    }
    Ok(chats)
}

fn display_name(row: &ChatRow, jid: &str) -> String {
    match row.subject.as_deref() {
        Some(subject) if !subject.is_empty() => subject.to_string(),
        _ if !jid.is_empty() => local_part(jid).to_string(),
        _ => row.id.to_string(),
    }
}

fn build_chat(
    row: ChatRow,
    ids: &IdentifierIndex,
    messages: Vec<Message>,
    attachments: &ChatAttachments,
) -> Chat {
    let jid = ids.resolve_or_empty(row.jid_row_id);
    let group = is_group(&jid);
    let name = display_name(&row, &jid);

    let participants = if group {
        attachments.participants.get(&jid).cloned()
    } else {
        None
    };

    let call_history = ids
        .row_id_of(&jid)
        .and_then(|jid_row_id| attachments.calls.get(&jid_row_id))
        .cloned();

    Chat {
        name,
        is_group: group,
        group_type: row.group_type,
        created: ms_to_iso(row.created_timestamp),
        archived: row.archived,
        ephemeral_seconds: row.ephemeral_expiration.filter(|s| *s != 0),
        message_count: messages.len(),
        messages,
        participants,
        total_calls: call_history.as_ref().map(Vec::len),
        call_history,
        jid,
    }
}
