//! Archive document types
//!
//! Field order matches the emitted JSON. Every `Option` field is left out of
//! the output when absent rather than written as `null`.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::codes::{CallResult, DeliveryStatus, MessageType};

/// The complete export
#[derive(Debug, Clone, Serialize)]
pub struct Archive {
    pub exported_at: String,
    pub source_db: String,
    pub total_chats: usize,
    pub total_messages: usize,
    pub contacts_count: usize,
    pub chats: Vec<Chat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    pub jid: String,
    pub name: String,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral_seconds: Option<i64>,
    pub messages: Vec<Message>,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_history: Option<Vec<CallLogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calls: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    pub from_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub status: DeliveryStatus,
    pub starred: bool,

    // Conditional attachments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_jid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<Reaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited: Option<Edit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Reacting identifier, empty when the row-id does not resolve
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Snapshot of the message being replied to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub from_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_jid_row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poll {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selectable: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_type: Option<i64>,
    pub options: Vec<PollOption>,
}

/// One poll choice.
///
/// `vote_count` is the total stored by the app and `voters` is rebuilt from
/// vote add-ons. The two can disagree (retracted votes) and are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollOption {
    pub option_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub vote_count: i64,
    pub voters: Vec<Voter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voter {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallLogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub from_me: bool,
    pub video_call: bool,
    pub duration_seconds: i64,
    pub result: CallResult,
    pub bytes_transferred: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub jid: String,
    pub is_admin: bool,
}

/// Convert a millisecond epoch value to an RFC 3339 UTC timestamp.
///
/// Null, non-positive and out-of-range values yield `None`.
pub fn ms_to_iso(ms: Option<i64>) -> Option<String> {
    let ms = ms.filter(|ms| *ms > 0)?;
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_iso() {
        assert_eq!(
            ms_to_iso(Some(1_700_000_000_123)).as_deref(),
            Some("2023-11-14T22:13:20.123+00:00")
        );
        assert_eq!(ms_to_iso(Some(0)), None);
        assert_eq!(ms_to_iso(Some(-5)), None);
        assert_eq!(ms_to_iso(None), None);
        assert_eq!(ms_to_iso(Some(i64::MAX)), None);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let media = Media {
            mime_type: Some("image/jpeg".to_string()),
            file_path: None,
            file_size: Some(2048),
            duration_seconds: None,
            caption: None,
            width: None,
            height: None,
            file_name: None,
            file_hash: None,
        };
        let json = serde_json::to_string(&media).unwrap();
        assert_eq!(json, r#"{"mime_type":"image/jpeg","file_size":2048}"#);
    }
}
