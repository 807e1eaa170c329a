//! Snapshot layout - the subset of msgstore.db read by the exporter
//!
//! Only the columns queried by the loaders are listed. Real snapshots carry
//! many more columns and tables; those are ignored.

pub const JID: &str = "jid";
pub const CHAT: &str = "chat";
pub const MESSAGE: &str = "message";

pub const MESSAGE_QUOTED: &str = "message_quoted";
pub const MESSAGE_MEDIA: &str = "message_media";
pub const CALL_LOG: &str = "call_log";
pub const MESSAGE_EDIT_INFO: &str = "message_edit_info";
pub const MESSAGE_THUMBNAIL: &str = "message_thumbnail";
pub const MESSAGE_POLL: &str = "message_poll";
pub const MESSAGE_POLL_OPTION: &str = "message_poll_option";
pub const MESSAGE_ADD_ON: &str = "message_add_on";
pub const MESSAGE_ADD_ON_REACTION: &str = "message_add_on_reaction";
pub const MESSAGE_ADD_ON_POLL_VOTE: &str = "message_add_on_poll_vote";
pub const MESSAGE_ADD_ON_POLL_VOTE_SELECTED_OPTION: &str =
    "message_add_on_poll_vote_selected_option";
pub const GROUP_PARTICIPANTS: &str = "group_participants";

/// Tables without which no archive can be produced
pub const REQUIRED_TABLES: &[&str] = &[JID, CHAT, MESSAGE];

/// Auxiliary tables; each may be absent depending on the app version
pub const OPTIONAL_TABLES: &[&str] = &[
    MESSAGE_QUOTED,
    MESSAGE_MEDIA,
    CALL_LOG,
    MESSAGE_EDIT_INFO,
    MESSAGE_THUMBNAIL,
    MESSAGE_POLL,
    MESSAGE_POLL_OPTION,
    MESSAGE_ADD_ON,
    MESSAGE_ADD_ON_REACTION,
    MESSAGE_ADD_ON_POLL_VOTE,
    MESSAGE_ADD_ON_POLL_VOTE_SELECTED_OPTION,
    GROUP_PARTICIPANTS,
];

/// `message_add_on.message_add_on_type` discriminators
pub const ADD_ON_REACTION: i64 = 56;
pub const ADD_ON_POLL_VOTE: i64 = 67;

/// DDL for a minimal snapshot. Used to build fixture databases.
pub const SNAPSHOT_SCHEMA: &str = r#"
-- ============================================
-- IDENTIFIERS, CHATS, MESSAGES
-- ============================================

CREATE TABLE IF NOT EXISTS jid (
    _id INTEGER PRIMARY KEY,
    raw_string TEXT                          -- '15551234567@s.whatsapp.net', '1203...@g.us'
);

CREATE TABLE IF NOT EXISTS chat (
    _id INTEGER PRIMARY KEY,
    jid_row_id INTEGER,
    subject TEXT,                            -- group subject, NULL for 1:1 chats
    group_type INTEGER,
    created_timestamp INTEGER,               -- ms since epoch
    archived INTEGER DEFAULT 0,
    ephemeral_expiration INTEGER,            -- seconds, NULL or 0 when disabled
    sort_timestamp INTEGER
);

CREATE TABLE IF NOT EXISTS message (
    _id INTEGER PRIMARY KEY,
    chat_row_id INTEGER,
    from_me INTEGER,
    key_id TEXT,
    sender_jid_row_id INTEGER,
    status INTEGER,
    timestamp INTEGER,
    received_timestamp INTEGER,
    message_type INTEGER,
    text_data TEXT,
    starred INTEGER
);

-- ============================================
-- PER-MESSAGE AUXILIARY TABLES
-- ============================================

CREATE TABLE IF NOT EXISTS message_quoted (
    message_row_id INTEGER PRIMARY KEY,
    from_me INTEGER,
    sender_jid_row_id INTEGER,
    key_id TEXT,
    message_type INTEGER,
    text_data TEXT
);

CREATE TABLE IF NOT EXISTS message_media (
    message_row_id INTEGER PRIMARY KEY,
    mime_type TEXT,
    file_path TEXT,
    file_size INTEGER,
    file_length INTEGER,
    media_duration INTEGER,
    media_caption TEXT,
    width INTEGER,
    height INTEGER,
    media_name TEXT,
    file_hash TEXT
);

CREATE TABLE IF NOT EXISTS message_edit_info (
    message_row_id INTEGER PRIMARY KEY,
    original_key_id TEXT,
    edited_timestamp INTEGER,
    sender_timestamp INTEGER
);

CREATE TABLE IF NOT EXISTS message_thumbnail (
    message_row_id INTEGER PRIMARY KEY,
    thumbnail BLOB
);

CREATE TABLE IF NOT EXISTS message_poll (
    message_row_id INTEGER PRIMARY KEY,
    selectable_options_count INTEGER,
    poll_type INTEGER
);

CREATE TABLE IF NOT EXISTS message_poll_option (
    _id INTEGER PRIMARY KEY,
    message_row_id INTEGER,
    option_name TEXT,
    vote_total INTEGER
);

-- ============================================
-- ADD-ONS (reactions, poll votes)
-- ============================================

CREATE TABLE IF NOT EXISTS message_add_on (
    _id INTEGER PRIMARY KEY,
    parent_message_row_id INTEGER,
    sender_jid_row_id INTEGER,
    message_add_on_type INTEGER              -- 56 reaction, 67 poll vote
);

CREATE TABLE IF NOT EXISTS message_add_on_reaction (
    message_add_on_row_id INTEGER PRIMARY KEY,
    reaction TEXT,
    sender_timestamp INTEGER
);

CREATE TABLE IF NOT EXISTS message_add_on_poll_vote (
    message_add_on_row_id INTEGER PRIMARY KEY,
    sender_timestamp INTEGER
);

CREATE TABLE IF NOT EXISTS message_add_on_poll_vote_selected_option (
    message_add_on_row_id INTEGER,
    message_poll_option_id INTEGER
);

-- ============================================
-- PER-CHAT AUXILIARY TABLES
-- ============================================

CREATE TABLE IF NOT EXISTS call_log (
    _id INTEGER PRIMARY KEY,
    jid_row_id INTEGER,
    from_me INTEGER,
    call_id TEXT,
    timestamp INTEGER,
    video_call INTEGER,
    duration INTEGER,
    call_result INTEGER,
    bytes_transferred INTEGER
);

CREATE TABLE IF NOT EXISTS group_participants (
    _id INTEGER PRIMARY KEY,
    gjid TEXT,
    jid TEXT,
    admin INTEGER
);
"#;
