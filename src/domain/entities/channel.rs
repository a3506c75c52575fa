//! Channel entity.
//!
//! A guild channel owns the bounded history of recently seen messages.

use serde::{Deserialize, Serialize};

use super::{Message, User};
use crate::shared::Shared;

/// Channel kinds delivered by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// A text channel within a guild
    #[default]
    Text,
    /// A direct message between two users
    Dm,
    /// A voice channel within a guild
    Voice,
    /// A direct message between multiple users
    GroupDm,
    /// A category that contains channels
    Category,
    /// An announcement channel
    News,
    /// A thread inside a text or announcement channel
    Thread,
    /// A stage channel
    Stage,
    /// A forum channel
    Forum,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Dm => "dm",
            Self::Voice => "voice",
            Self::GroupDm => "group_dm",
            Self::Category => "category",
            Self::News => "news",
            Self::Thread => "thread",
            Self::Stage => "stage",
            Self::Forum => "forum",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a channel, either inside a guild or a private (DM) channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    /// Snowflake ID
    pub id: String,

    /// Guild ID (None for DM channels)
    #[serde(default)]
    pub guild_id: Option<String>,

    #[serde(default)]
    pub name: String,

    /// Channel type
    #[serde(rename = "type", default)]
    pub kind: ChannelType,

    #[serde(default)]
    pub topic: Option<String>,

    /// Sorting position within category or guild
    #[serde(default)]
    pub position: i32,

    /// Parent category ID
    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub nsfw: bool,

    /// ID of the newest message seen in this channel
    #[serde(default)]
    pub last_message_id: Option<String>,

    /// Other participants of a DM channel
    #[serde(default)]
    pub recipients: Vec<User>,

    /// Retained history, oldest first. Owned by the cache: it is built by
    /// message events only and ignored when a channel record is added.
    #[serde(skip)]
    pub messages: Vec<Shared<Message>>,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find a retained message by ID.
    pub fn message(&self, message_id: &str) -> Option<&Shared<Message>> {
        self.messages.iter().find(|m| m.read().id == message_id)
    }

    /// IDs of the retained messages, oldest first.
    pub fn message_ids(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.read().id.clone()).collect()
    }

    /// Overwrite this record with `incoming`, keeping the retained history.
    pub(crate) fn merge_from(&mut self, mut incoming: Channel) {
        incoming.messages = std::mem::take(&mut self.messages);
        if incoming.last_message_id.is_none() {
            incoming.last_message_id = self.last_message_id.take();
        }
        *self = incoming;
    }

    /// Append a message and evict from the front down to `max` entries.
    /// Returns the number of evicted messages.
    pub(crate) fn push_message(&mut self, message: Shared<Message>, max: usize) -> usize {
        self.last_message_id = Some(message.read().id.clone());
        self.messages.push(message);

        let excess = self.messages.len().saturating_sub(max);
        if excess > 0 {
            self.messages.drain(..excess);
        }
        excess
    }
}
