//! Guild Member entity.
//!
//! A user's guild-scoped profile, keyed by (guild ID, user ID).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Represents a user's membership in a guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Guild ID (part of the composite key)
    #[serde(default)]
    pub guild_id: String,

    /// The member's user; `user.id` is the other half of the key
    pub user: User,

    /// Guild-specific nickname
    #[serde(default)]
    pub nick: Option<String>,

    /// IDs of roles assigned to this member
    #[serde(default)]
    pub roles: Vec<String>,

    /// When the user joined the guild (`None` when the event did not say)
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,

    /// Whether the member is server-deafened
    #[serde(default)]
    pub deaf: bool,

    /// Whether the member is server-muted
    #[serde(default)]
    pub mute: bool,

    /// Whether the member has not yet passed membership screening
    #[serde(default)]
    pub pending: bool,
}

impl Member {
    /// Create a new member with just the required fields.
    pub fn new(guild_id: impl Into<String>, user: User) -> Self {
        Self {
            guild_id: guild_id.into(),
            user,
            ..Default::default()
        }
    }

    /// The user half of the member key.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Check if the member has a specific role.
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }

    /// Get the display name (nickname or fallback to the user's name).
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or_else(|| self.user.display_name())
    }

    /// Overwrite this record with `incoming`, never forgetting a known join time.
    pub(crate) fn merge_from(&mut self, mut incoming: Member) {
        if incoming.joined_at.is_none() {
            incoming.joined_at = self.joined_at;
        }
        *self = incoming;
    }
}
