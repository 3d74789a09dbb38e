//! Store chat messages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "chat_channel", rename_all = "lowercase")
)]
pub enum ChatChannel {
    General,
    Kitchen,
    Managers,
    Drivers,
    Announcements,
}

impl ChatChannel {
    pub const ALL: [ChatChannel; 5] = [
        Self::General,
        Self::Kitchen,
        Self::Managers,
        Self::Drivers,
        Self::Announcements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Kitchen => "kitchen",
            Self::Managers => "managers",
            Self::Drivers => "drivers",
            Self::Announcements => "announcements",
        }
    }
}

impl fmt::Display for ChatChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatChannel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidChannel,
                    format!("Unknown chat channel: {s}"),
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ChatMessage {
    pub id: i64,
    pub store_id: i64,
    pub channel: ChatChannel,
    pub sender: String,
    pub text: String,
    pub pinned: bool,
    pub announcement: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageCreate {
    pub store_id: i64,
    /// Raw channel name, validated on create
    pub channel: String,
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub announcement: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessageUpdate {
    pub text: Option<String>,
    pub pinned: Option<bool>,
    pub announcement: Option<bool>,
}

impl ChatMessage {
    /// Messages in the announcements channel are always flagged as announcements.
    pub fn from_create(id: i64, data: ChatMessageCreate, now: i64) -> AppResult<Self> {
        let channel: ChatChannel = data.channel.parse()?;
        if data.sender.trim().is_empty() {
            return Err(AppError::required("sender"));
        }
        if data.text.trim().is_empty() {
            return Err(AppError::required("text"));
        }
        Ok(Self {
            id,
            store_id: data.store_id,
            channel,
            sender: data.sender,
            text: data.text,
            pinned: data.pinned,
            announcement: data.announcement || channel == ChatChannel::Announcements,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, data: ChatMessageUpdate, now: i64) -> AppResult<()> {
        if let Some(text) = data.text {
            if text.trim().is_empty() {
                return Err(AppError::required("text"));
            }
            self.text = text;
        }
        if let Some(v) = data.pinned {
            self.pinned = v;
        }
        if let Some(v) = data.announcement {
            self.announcement = v || self.channel == ChatChannel::Announcements;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(channel: &str) -> ChatMessageCreate {
        ChatMessageCreate {
            store_id: 1,
            channel: channel.into(),
            sender: "Sam".into(),
            text: "Walk-in cooler is at 41F".into(),
            pinned: false,
            announcement: false,
        }
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("kitchen".parse::<ChatChannel>().unwrap(), ChatChannel::Kitchen);
        let err = "random".parse::<ChatChannel>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidChannel);
    }

    #[test]
    fn test_announcements_channel_forces_flag() {
        let msg = ChatMessage::from_create(1, create("announcements"), 0).unwrap();
        assert!(msg.announcement);
        let msg = ChatMessage::from_create(2, create("general"), 0).unwrap();
        assert!(!msg.announcement);
    }

    #[test]
    fn test_update_keeps_channel_rules() {
        let mut msg = ChatMessage::from_create(1, create("announcements"), 0).unwrap();
        msg.apply_update(
            ChatMessageUpdate {
                announcement: Some(false),
                pinned: Some(true),
                ..Default::default()
            },
            5,
        )
        .unwrap();
        assert!(msg.announcement);
        assert!(msg.pinned);
        assert_eq!(msg.updated_at, 5);
    }
}
