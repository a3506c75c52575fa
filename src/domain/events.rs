//! Decoded Gateway Events
//!
//! The subset of gateway dispatch events that mutate cached state, already
//! decoded into entity records. Serialized as `{"t": "<NAME>", "d": {...}}`.

use serde::{Deserialize, Serialize};

use super::entities::{Channel, Emoji, GuildPatch, Member, Message, MessagePatch, Role, User, VoiceState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "d")]
pub enum CacheEvent {
    // Guild events
    #[serde(rename = "GUILD_CREATE")]
    GuildCreate(GuildPatch),
    #[serde(rename = "GUILD_UPDATE")]
    GuildUpdate(GuildPatch),
    #[serde(rename = "GUILD_DELETE")]
    GuildDelete(GuildDeleteEvent),

    // Member events
    #[serde(rename = "GUILD_MEMBER_ADD")]
    GuildMemberAdd(Member),
    #[serde(rename = "GUILD_MEMBER_UPDATE")]
    GuildMemberUpdate(Member),
    #[serde(rename = "GUILD_MEMBER_REMOVE")]
    GuildMemberRemove(GuildMemberRemoveEvent),
    #[serde(rename = "GUILD_MEMBERS_CHUNK")]
    GuildMembersChunk(GuildMembersChunkEvent),

    // Role events
    #[serde(rename = "GUILD_ROLE_CREATE")]
    GuildRoleCreate(GuildRoleEvent),
    #[serde(rename = "GUILD_ROLE_UPDATE")]
    GuildRoleUpdate(GuildRoleEvent),
    #[serde(rename = "GUILD_ROLE_DELETE")]
    GuildRoleDelete(GuildRoleDeleteEvent),

    // Emoji events
    #[serde(rename = "GUILD_EMOJIS_UPDATE")]
    GuildEmojisUpdate(GuildEmojisUpdateEvent),

    // Channel events
    #[serde(rename = "CHANNEL_CREATE")]
    ChannelCreate(Channel),
    #[serde(rename = "CHANNEL_UPDATE")]
    ChannelUpdate(Channel),
    #[serde(rename = "CHANNEL_DELETE")]
    ChannelDelete(Channel),

    // Message events
    #[serde(rename = "MESSAGE_CREATE")]
    MessageCreate(Message),
    #[serde(rename = "MESSAGE_UPDATE")]
    MessageUpdate(MessagePatch),
    #[serde(rename = "MESSAGE_DELETE")]
    MessageDelete(MessageDeleteEvent),
    #[serde(rename = "MESSAGE_DELETE_BULK")]
    MessageDeleteBulk(MessageDeleteBulkEvent),

    // Presence events
    #[serde(rename = "VOICE_STATE_UPDATE")]
    VoiceStateUpdate(VoiceState),
    #[serde(rename = "USER_UPDATE")]
    UserUpdate(User),
}

impl CacheEvent {
    /// Get the event name for dispatch
    pub fn event_name(&self) -> &'static str {
        match self {
            CacheEvent::GuildCreate(_) => "GUILD_CREATE",
            CacheEvent::GuildUpdate(_) => "GUILD_UPDATE",
            CacheEvent::GuildDelete(_) => "GUILD_DELETE",
            CacheEvent::GuildMemberAdd(_) => "GUILD_MEMBER_ADD",
            CacheEvent::GuildMemberUpdate(_) => "GUILD_MEMBER_UPDATE",
            CacheEvent::GuildMemberRemove(_) => "GUILD_MEMBER_REMOVE",
            CacheEvent::GuildMembersChunk(_) => "GUILD_MEMBERS_CHUNK",
            CacheEvent::GuildRoleCreate(_) => "GUILD_ROLE_CREATE",
            CacheEvent::GuildRoleUpdate(_) => "GUILD_ROLE_UPDATE",
            CacheEvent::GuildRoleDelete(_) => "GUILD_ROLE_DELETE",
            CacheEvent::GuildEmojisUpdate(_) => "GUILD_EMOJIS_UPDATE",
            CacheEvent::ChannelCreate(_) => "CHANNEL_CREATE",
            CacheEvent::ChannelUpdate(_) => "CHANNEL_UPDATE",
            CacheEvent::ChannelDelete(_) => "CHANNEL_DELETE",
            CacheEvent::MessageCreate(_) => "MESSAGE_CREATE",
            CacheEvent::MessageUpdate(_) => "MESSAGE_UPDATE",
            CacheEvent::MessageDelete(_) => "MESSAGE_DELETE",
            CacheEvent::MessageDeleteBulk(_) => "MESSAGE_DELETE_BULK",
            CacheEvent::VoiceStateUpdate(_) => "VOICE_STATE_UPDATE",
            CacheEvent::UserUpdate(_) => "USER_UPDATE",
        }
    }

    /// Get the guild ID this event belongs to (for routing)
    pub fn guild_id(&self) -> Option<&str> {
        match self {
            CacheEvent::GuildCreate(e) | CacheEvent::GuildUpdate(e) => Some(&e.id),
            CacheEvent::GuildDelete(e) => Some(&e.id),
            CacheEvent::GuildMemberAdd(e) | CacheEvent::GuildMemberUpdate(e) => Some(&e.guild_id),
            CacheEvent::GuildMemberRemove(e) => Some(&e.guild_id),
            CacheEvent::GuildMembersChunk(e) => Some(&e.guild_id),
            CacheEvent::GuildRoleCreate(e) | CacheEvent::GuildRoleUpdate(e) => Some(&e.guild_id),
            CacheEvent::GuildRoleDelete(e) => Some(&e.guild_id),
            CacheEvent::GuildEmojisUpdate(e) => Some(&e.guild_id),
            CacheEvent::ChannelCreate(e)
            | CacheEvent::ChannelUpdate(e)
            | CacheEvent::ChannelDelete(e) => e.guild_id.as_deref(),
            CacheEvent::MessageCreate(e) => e.guild_id.as_deref(),
            CacheEvent::MessageUpdate(e) => e.guild_id.as_deref(),
            CacheEvent::MessageDelete(e) => e.guild_id.as_deref(),
            CacheEvent::MessageDeleteBulk(e) => e.guild_id.as_deref(),
            CacheEvent::VoiceStateUpdate(e) => Some(&e.guild_id),
            CacheEvent::UserUpdate(_) => None,
        }
    }
}

// Event payload structs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberRemoveEvent {
    pub guild_id: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMembersChunkEvent {
    pub guild_id: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleEvent {
    pub guild_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleDeleteEvent {
    pub guild_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildEmojisUpdateEvent {
    pub guild_id: String,
    pub emojis: Vec<Emoji>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteEvent {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteBulkEvent {
    pub ids: Vec<String>,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
}
