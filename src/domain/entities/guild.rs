//! Guild entity and the guild payload delivered by GUILD_CREATE/GUILD_UPDATE.
//!
//! `Guild` is the record the cache keeps. `GuildPatch` is what the gateway
//! sends: the collections it may omit are `Option`s, so a partial update can
//! be told apart from "this guild has no roles".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Channel, Emoji, Member, Role, VoiceState};
use crate::shared::{shared, Shared};

/// Represents a guild (community) held by one shard.
///
/// Members are not stored here; the shard's member map is authoritative and
/// `ShardStore::members` gives the derived list.
#[derive(Debug, Clone, Default)]
pub struct Guild {
    /// Snowflake ID
    pub id: String,

    pub name: String,

    /// Icon hash
    pub icon: Option<String>,

    /// User ID of the guild owner
    pub owner_id: String,

    /// Whether the guild is temporarily unavailable (outage)
    pub unavailable: bool,

    /// Whether the guild counts as "large" for member chunking
    pub large: bool,

    /// Approximate member count reported by the gateway
    pub member_count: u64,

    /// When the current user joined the guild
    pub joined_at: Option<DateTime<Utc>>,

    pub roles: Vec<Arc<Role>>,

    pub emojis: Vec<Arc<Emoji>>,

    pub channels: Vec<Shared<Channel>>,

    pub voice_states: Vec<Arc<VoiceState>>,
}

impl Guild {
    pub fn role(&self, role_id: &str) -> Option<&Arc<Role>> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    pub fn channel(&self, channel_id: &str) -> Option<&Shared<Channel>> {
        self.channels.iter().find(|c| c.read().id == channel_id)
    }

    pub fn emoji(&self, emoji_id: &str) -> Option<&Arc<Emoji>> {
        self.emojis.iter().find(|e| e.id == emoji_id)
    }

    pub fn voice_state(&self, user_id: &str) -> Option<&Arc<VoiceState>> {
        self.voice_states.iter().find(|v| v.user_id == user_id)
    }

    /// Replace the role with the same ID, or append it.
    pub(crate) fn upsert_role(&mut self, role: Role) {
        match self.roles.iter_mut().find(|r| r.id == role.id) {
            Some(slot) => *slot = Arc::new(role),
            None => self.roles.push(Arc::new(role)),
        }
    }

    /// Replace the emoji with the same ID, or append it.
    pub(crate) fn upsert_emoji(&mut self, emoji: Emoji) {
        match self.emojis.iter_mut().find(|e| e.id == emoji.id) {
            Some(slot) => *slot = Arc::new(emoji),
            None => self.emojis.push(Arc::new(emoji)),
        }
    }

    /// Update the channel with the same ID in place, or append it.
    pub(crate) fn upsert_channel(&mut self, mut channel: Channel) {
        match self.channel(&channel.id) {
            Some(existing) => existing.update(|stored| stored.merge_from(channel)),
            None => {
                channel.messages.clear();
                self.channels.push(shared(channel));
            }
        }
    }

    /// Replace the whole channel list, reusing the handles (and histories) of
    /// channels that survive. Channels without a guild are stamped with ours.
    fn replace_channels(&mut self, incoming: Vec<Channel>) {
        let mut channels = Vec::with_capacity(incoming.len());
        for mut channel in incoming {
            channel.guild_id.get_or_insert_with(|| self.id.clone());
            match self.channel(&channel.id) {
                Some(existing) => {
                    existing.update(|stored| stored.merge_from(channel));
                    channels.push(existing.clone());
                }
                None => {
                    channel.messages.clear();
                    channels.push(shared(channel));
                }
            }
        }
        self.channels = channels;
    }

    /// Overwrite this record with `patch`, backfilling every collection (and
    /// the member count and join time) the patch leaves out.
    pub(crate) fn merge_from(&mut self, patch: GuildPatch) {
        self.id = patch.id;
        self.name = patch.name;
        self.icon = patch.icon;
        self.owner_id = patch.owner_id;
        self.unavailable = patch.unavailable;
        self.large = patch.large;

        if let Some(count) = patch.member_count {
            self.member_count = count;
        }
        if patch.joined_at.is_some() {
            self.joined_at = patch.joined_at;
        }
        if let Some(roles) = patch.roles {
            self.roles = roles.into_iter().map(Arc::new).collect();
        }
        if let Some(emojis) = patch.emojis {
            self.emojis = emojis.into_iter().map(Arc::new).collect();
        }
        if let Some(channels) = patch.channels {
            self.replace_channels(channels);
        }
        if let Some(voice_states) = patch.voice_states {
            self.voice_states = voice_states
                .into_iter()
                .map(|mut state| {
                    if state.guild_id.is_empty() {
                        state.guild_id = self.id.clone();
                    }
                    Arc::new(state)
                })
                .collect();
        }
    }
}

impl From<GuildPatch> for Guild {
    fn from(patch: GuildPatch) -> Self {
        let mut guild = Guild::default();
        guild.merge_from(patch);
        guild
    }
}

/// Guild payload as delivered by GUILD_CREATE / GUILD_UPDATE.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildPatch {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub owner_id: String,

    #[serde(default)]
    pub unavailable: bool,

    #[serde(default)]
    pub large: bool,

    #[serde(default)]
    pub member_count: Option<u64>,

    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub roles: Option<Vec<Role>>,

    #[serde(default)]
    pub emojis: Option<Vec<Emoji>>,

    #[serde(default)]
    pub channels: Option<Vec<Channel>>,

    #[serde(default)]
    pub voice_states: Option<Vec<VoiceState>>,

    /// Member snapshot embedded in GUILD_CREATE; never kept on the guild
    #[serde(default)]
    pub members: Vec<Member>,

    /// Presence snapshot; not cached
    #[serde(default)]
    pub presences: Vec<serde_json::Value>,

    /// Active threads; not cached
    #[serde(default)]
    pub threads: Vec<Channel>,
}

impl GuildPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Detach the embedded member, presence and thread lists from the payload,
    /// returning the members.
    pub(crate) fn strip_embedded(&mut self) -> Vec<Member> {
        self.presences.clear();
        self.threads.clear();
        std::mem::take(&mut self.members)
    }
}
