//! Common Test Utilities
//!
//! Shared fixtures for building cache state.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use gateway_state::application::EventDispatcher;
use gateway_state::domain::{Channel, GuildPatch, Member, Message, User};
use gateway_state::infrastructure::cache::{ShardStore, State};

/// Guild and channel every fixture message belongs to
pub const GUILD_ID: &str = "g1";
pub const CHANNEL_ID: &str = "c1";

/// A state with shard 0 registered
pub fn state_with_shard(max_message_count: usize) -> (Arc<State>, Arc<ShardStore>) {
    let state = Arc::new(State::with_max_message_count(max_message_count));
    let shard = state.create_shard(0);
    (state, shard)
}

/// Shard 0 already holding `GUILD_ID` with a text channel `CHANNEL_ID`
pub fn seeded_shard(max_message_count: usize) -> (Arc<State>, Arc<ShardStore>) {
    let (state, shard) = state_with_shard(max_message_count);
    shard.guild_add(GuildPatch::new(GUILD_ID)).unwrap();
    shard
        .channel_add(GUILD_ID, Channel::new(CHANNEL_ID, "general"))
        .unwrap();
    (state, shard)
}

pub fn dispatcher(max_message_count: usize) -> EventDispatcher {
    let (state, _) = state_with_shard(max_message_count);
    EventDispatcher::new(state)
}

pub fn member(user_id: &str) -> Member {
    Member::new(GUILD_ID, User::new(user_id, format!("user-{}", user_id)))
}

pub fn message(id: &str) -> Message {
    let mut message = Message::new(id, CHANNEL_ID, format!("content of {}", id));
    message.guild_id = Some(GUILD_ID.to_string());
    message
}

/// Fixed point in time, `secs` after the epoch
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}
