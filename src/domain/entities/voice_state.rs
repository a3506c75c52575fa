//! Voice presence entity.

use serde::{Deserialize, Serialize};

/// "User X is connected to voice channel Y" within a guild.
///
/// A `channel_id` of `None` means the user is not in voice; the cache treats
/// such an update as the user leaving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    #[serde(default)]
    pub guild_id: String,

    /// Voice channel the user is connected to
    #[serde(default)]
    pub channel_id: Option<String>,

    pub user_id: String,

    #[serde(default)]
    pub session_id: String,

    #[serde(default)]
    pub deaf: bool,

    #[serde(default)]
    pub mute: bool,

    #[serde(default)]
    pub self_deaf: bool,

    #[serde(default)]
    pub self_mute: bool,

    #[serde(default)]
    pub self_video: bool,

    #[serde(default)]
    pub suppress: bool,
}

impl VoiceState {
    /// A state placing `user_id` in `channel_id`.
    pub fn joined(
        guild_id: impl Into<String>,
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            channel_id: Some(channel_id.into()),
            ..Default::default()
        }
    }

    /// A state reporting that `user_id` left voice.
    pub fn left(guild_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Whether this state puts the user in a voice channel.
    pub fn is_connected(&self) -> bool {
        self.channel_id.as_deref().is_some_and(|c| !c.is_empty())
    }
}
