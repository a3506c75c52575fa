//! Role entity.

use serde::{Deserialize, Serialize};

/// Represents a role in a guild.
///
/// Roles are replaced wholesale on update; holders of an older `Arc<Role>`
/// keep the snapshot they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Snowflake ID
    pub id: String,

    /// Role name
    pub name: String,

    /// Permission bitfield
    #[serde(default)]
    pub permissions: u64,

    /// Position in the role hierarchy (higher = more priority)
    #[serde(default)]
    pub position: i32,

    /// RGB color value (0 for no color)
    #[serde(default)]
    pub color: u32,

    /// Whether this role is shown separately in the member list
    #[serde(default)]
    pub hoist: bool,

    /// Whether this role is managed by an integration
    #[serde(default)]
    pub managed: bool,

    /// Whether this role is mentionable by everyone
    #[serde(default)]
    pub mentionable: bool,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check whether every bit of `permission` is granted.
    pub fn has_permission(&self, permission: u64) -> bool {
        self.permissions & permission == permission
    }
}
