//! Custom guild emoji.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// Snowflake ID
    pub id: String,

    /// Emoji name, without colons
    pub name: String,

    /// Roles allowed to use this emoji (empty = everyone)
    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub managed: bool,

    #[serde(default)]
    pub require_colons: bool,

    #[serde(default)]
    pub animated: bool,

    #[serde(default)]
    pub available: bool,
}

impl Emoji {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available: true,
            ..Default::default()
        }
    }

    /// Format for use inside message content, e.g. `<a:party:123>`.
    pub fn message_format(&self) -> String {
        if self.animated {
            format!("<a:{}:{}>", self.name, self.id)
        } else {
            format!("<:{}:{}>", self.name, self.id)
        }
    }
}
