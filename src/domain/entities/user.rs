//! User entity.
//!
//! Global identity record, shared by every shard a user appears on.

use serde::{Deserialize, Serialize};

/// Represents a platform user as delivered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (string form)
    pub id: String,

    /// Username
    pub username: String,

    /// Legacy discriminator ("0" for migrated accounts)
    #[serde(default)]
    pub discriminator: String,

    /// Display name shown instead of the username
    #[serde(default)]
    pub global_name: Option<String>,

    /// Avatar hash
    #[serde(default)]
    pub avatar: Option<String>,

    /// Whether the account belongs to a bot
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a user with just an ID and username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Get the display name (global name or fallback to username).
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}
