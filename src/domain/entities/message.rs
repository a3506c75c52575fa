//! Message entity and its partial-update patch.
//!
//! `Message` is the full record kept in a channel's history. `MessagePatch`
//! carries an update where every mutable field is explicitly present or
//! absent, so an edit that only mentions the content never wipes embeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, User};

/// Rich embed attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub color: Option<u32>,
}

/// Interactive component (action row, button, select menu, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageComponent {
    /// Component type
    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(default)]
    pub custom_id: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    /// Child components (for action rows)
    #[serde(default)]
    pub components: Vec<MessageComponent>,
}

/// Represents a message retained in a channel's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID
    pub id: String,

    /// Channel the message was sent in
    pub channel_id: String,

    /// Guild the channel belongs to (`None` for DMs)
    #[serde(default)]
    pub guild_id: Option<String>,

    /// Message author
    #[serde(default)]
    pub author: Option<User>,

    /// Text content
    #[serde(default)]
    pub content: String,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// When the message was last edited
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub mentions: Vec<User>,

    #[serde(default)]
    pub embeds: Vec<Embed>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub components: Vec<MessageComponent>,

    #[serde(default)]
    pub pinned: bool,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            guild_id: None,
            author: None,
            content: content.into(),
            timestamp: Utc::now(),
            edited_timestamp: None,
            mentions: Vec::new(),
            embeds: Vec::new(),
            attachments: Vec::new(),
            components: Vec::new(),
            pinned: false,
        }
    }

    /// Check if this message has been edited.
    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }

    /// Apply the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: MessagePatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(edited) = patch.edited_timestamp {
            self.edited_timestamp = Some(edited);
        }
        if let Some(mentions) = patch.mentions {
            self.mentions = mentions;
        }
        if let Some(embeds) = patch.embeds {
            self.embeds = embeds;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(author) = patch.author {
            self.author = Some(author);
        }
        if let Some(components) = patch.components {
            self.components = components;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
    }
}

/// Partial message update.
///
/// `None` means "not mentioned by the event"; `Some(vec![])` clears the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePatch {
    pub id: String,

    pub channel_id: String,

    #[serde(default)]
    pub guild_id: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub mentions: Option<Vec<User>>,

    #[serde(default)]
    pub embeds: Option<Vec<Embed>>,

    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub author: Option<User>,

    #[serde(default)]
    pub components: Option<Vec<MessageComponent>>,

    #[serde(default)]
    pub pinned: Option<bool>,
}

impl MessagePatch {
    pub fn new(id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            ..Default::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn edited_at(mut self, at: DateTime<Utc>) -> Self {
        self.edited_timestamp = Some(at);
        self
    }

    pub fn embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = Some(embeds);
        self
    }
}

/// A full message re-delivered for an ID that is already cached only
/// contributes the fields it actually carries: empty content and empty
/// lists count as "not mentioned". The pin flag is always kept.
impl From<Message> for MessagePatch {
    fn from(message: Message) -> Self {
        fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
            (!v.is_empty()).then_some(v)
        }

        Self {
            id: message.id,
            channel_id: message.channel_id,
            guild_id: message.guild_id,
            content: (!message.content.is_empty()).then_some(message.content),
            edited_timestamp: message.edited_timestamp,
            mentions: non_empty(message.mentions),
            embeds: non_empty(message.embeds),
            attachments: non_empty(message.attachments),
            timestamp: Some(message.timestamp),
            author: message.author,
            components: non_empty(message.components),
            pinned: None,
        }
    }
}
