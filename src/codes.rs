//! Closed code tables for numeric snapshot columns
//!
//! Each enum carries an `Unknown` variant holding the raw code, so values
//! introduced by newer app versions survive into the archive as tagged
//! strings instead of failing the export.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// `message.message_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Text,
    Image,
    Audio,
    Video,
    System,
    Document,
    MissedCall,
    Gif,
    Deleted,
    LiveLocation,
    Sticker,
    Poll,
    ViewOnceImage,
    ViewOnceVideo,
    PollUpdate,
    CallLog,
    E2eNotification,
    EphemeralNotification,
    CommunityAlert,
    Event,
    /// NULL in the snapshot
    Missing,
    Unknown(i64),
}

impl MessageType {
    /// Map a nullable column; NULL is kept distinct from any real code
    pub fn from_column(code: Option<i64>) -> Self {
        code.map_or(Self::Missing, Self::from_code)
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Text,
            1 => Self::Image,
            2 => Self::Audio,
            3 => Self::Video,
            7 => Self::System,
            9 => Self::Document,
            10 => Self::MissedCall,
            13 => Self::Gif,
            15 => Self::Deleted,
            16 => Self::LiveLocation,
            20 => Self::Sticker,
            27 => Self::Poll,
            42 => Self::ViewOnceImage,
            43 => Self::ViewOnceVideo,
            64 => Self::PollUpdate,
            66 => Self::CallLog,
            90 => Self::E2eNotification,
            99 => Self::EphemeralNotification,
            112 => Self::CommunityAlert,
            116 => Self::Event,
            other => Self::Unknown(other),
        }
    }

    pub fn as_str(&self) -> Cow<'static, str> {
        let label = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::System => "system",
            Self::Document => "document",
            Self::MissedCall => "missed_call",
            Self::Gif => "gif",
            Self::Deleted => "deleted",
            Self::LiveLocation => "live_location",
            Self::Sticker => "sticker",
            Self::Poll => "poll",
            Self::ViewOnceImage => "view_once_image",
            Self::ViewOnceVideo => "view_once_video",
            Self::PollUpdate => "poll_update",
            Self::CallLog => "call_log",
            Self::E2eNotification => "e2e_notification",
            Self::EphemeralNotification => "ephemeral_notification",
            Self::CommunityAlert => "community_alert",
            Self::Event => "event",
            Self::Missing => "unknown",
            Self::Unknown(code) => return Cow::Owned(format!("unknown_{}", code)),
        };
        Cow::Borrowed(label)
    }
}

/// `message.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Received,
    Sent,
    Delivered,
    Read,
    Played,
    Unknown(i64),
}

impl DeliveryStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Received,
            4 => Self::Sent,
            5 => Self::Delivered,
            6 => Self::Read,
            13 => Self::Played,
            other => Self::Unknown(other),
        }
    }

    pub fn as_str(&self) -> Cow<'static, str> {
        let label = match self {
            Self::Received => "received",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Played => "played",
            Self::Unknown(code) => return Cow::Owned(format!("status_{}", code)),
        };
        Cow::Borrowed(label)
    }
}

/// `call_log.call_result`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallResult {
    /// Code 0: the app itself records no outcome
    Unspecified,
    Missed,
    Rejected,
    Busy,
    Answered,
    Unavailable,
    Declined,
    Unknown(i64),
}

impl CallResult {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Unspecified,
            2 => Self::Missed,
            3 => Self::Rejected,
            4 => Self::Busy,
            5 => Self::Answered,
            7 => Self::Unavailable,
            8 => Self::Declined,
            other => Self::Unknown(other),
        }
    }

    pub fn as_str(&self) -> Cow<'static, str> {
        let label = match self {
            Self::Unspecified => "unknown",
            Self::Missed => "missed",
            Self::Rejected => "rejected",
            Self::Busy => "busy",
            Self::Answered => "answered",
            Self::Unavailable => "unavailable",
            Self::Declined => "declined",
            Self::Unknown(code) => return Cow::Owned(format!("result_{}", code)),
        };
        Cow::Borrowed(label)
    }
}

macro_rules! label_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.as_str())
            }
        }
    )*};
}

label_impls!(MessageType, DeliveryStatus, CallResult);
