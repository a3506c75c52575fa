//! Event Dispatcher
//!
//! Applies decoded gateway events to the cache: guild-scoped events go to the
//! shard store the event arrived on, user records go to the global directory.

use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::{Channel, ChannelType, Member};
use crate::domain::events::{CacheEvent, MessageDeleteBulkEvent};
use crate::infrastructure::cache::{ShardStore, State};
use crate::infrastructure::metrics;
use crate::shared::{CacheError, CacheResult};

/// What a dispatched event did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event changed cached state
    Applied,
    /// Nothing to do: history disabled, a DM-less channel, or the target was
    /// already gone
    Skipped,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Applied => "applied",
            DispatchOutcome::Skipped => "skipped",
        }
    }
}

/// Routes events to the global store and shard stores
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    state: Arc<State>,
}

impl EventDispatcher {
    pub fn new(state: Arc<State>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    /// Apply one event received on `shard_id`.
    ///
    /// Removals of entities that are not cached are reported as `Skipped`.
    /// Any other missing parent (an unknown guild or channel) is returned as
    /// an error for the caller to decide on.
    pub fn dispatch(&self, shard_id: u32, event: CacheEvent) -> CacheResult<DispatchOutcome> {
        let name = event.event_name();
        let result = self
            .state
            .shard(shard_id)
            .and_then(|shard| self.apply(&shard, event));

        let outcome = match &result {
            Ok(outcome) => outcome.as_str(),
            Err(_) => "error",
        };
        trace!(shard_id, event = name, outcome, "Dispatched event");
        metrics::record_event(name, outcome);

        result
    }

    fn apply(&self, shard: &ShardStore, event: CacheEvent) -> CacheResult<DispatchOutcome> {
        match event {
            CacheEvent::GuildCreate(guild) | CacheEvent::GuildUpdate(guild) => {
                for member in &guild.members {
                    self.state.user_add(member.user.clone());
                }
                shard.guild_add(guild)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::GuildDelete(event) => benign(shard.guild_remove(&event.id)),

            CacheEvent::GuildMemberAdd(member) => {
                self.state.user_add(member.user.clone());
                shard.member_join(member)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::GuildMemberUpdate(member) => {
                self.member_upsert(shard, member)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::GuildMemberRemove(event) => {
                benign(shard.member_leave(&event.guild_id, &event.user.id))
            }
            CacheEvent::GuildMembersChunk(event) => {
                for mut member in event.members {
                    if member.guild_id.is_empty() {
                        member.guild_id = event.guild_id.clone();
                    }
                    self.member_upsert(shard, member)?;
                }
                Ok(DispatchOutcome::Applied)
            }

            CacheEvent::GuildRoleCreate(event) | CacheEvent::GuildRoleUpdate(event) => {
                shard.role_add(&event.guild_id, event.role)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::GuildRoleDelete(event) => {
                benign(shard.role_remove(&event.guild_id, &event.role_id))
            }
            CacheEvent::GuildEmojisUpdate(event) => {
                shard.emojis_update(&event.guild_id, event.emojis)?;
                Ok(DispatchOutcome::Applied)
            }

            CacheEvent::ChannelCreate(channel) | CacheEvent::ChannelUpdate(channel) => {
                match channel.guild_id.clone() {
                    Some(guild_id) => {
                        shard.channel_add(&guild_id, channel)?;
                        Ok(DispatchOutcome::Applied)
                    }
                    None => private_channel_add(shard, &channel),
                }
            }
            CacheEvent::ChannelDelete(channel) => match channel.guild_id.as_deref() {
                Some(guild_id) => benign(shard.channel_remove(guild_id, &channel.id)),
                None => private_channel_remove(shard, &channel),
            },

            CacheEvent::MessageCreate(message) => {
                if let Some(author) = &message.author {
                    self.state.user_add(author.clone());
                }
                let Some(guild_id) = self.history_guild(shard, message.guild_id.as_deref()) else {
                    return Ok(DispatchOutcome::Skipped);
                };
                shard.message_add(&guild_id, message)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::MessageUpdate(patch) => {
                let Some(guild_id) = self.history_guild(shard, patch.guild_id.as_deref()) else {
                    return Ok(DispatchOutcome::Skipped);
                };
                benign(shard.message_update(&guild_id, patch))
            }
            CacheEvent::MessageDelete(event) => {
                let Some(guild_id) = self.history_guild(shard, event.guild_id.as_deref()) else {
                    return Ok(DispatchOutcome::Skipped);
                };
                benign(shard.message_remove_by_id(&guild_id, &event.channel_id, &event.id))
            }
            CacheEvent::MessageDeleteBulk(event) => self.message_delete_bulk(shard, event),

            CacheEvent::VoiceStateUpdate(voice_state) => {
                shard.voice_state_update(voice_state)?;
                Ok(DispatchOutcome::Applied)
            }
            CacheEvent::UserUpdate(user) => {
                self.state.user_add(user);
                Ok(DispatchOutcome::Applied)
            }
        }
    }

    fn member_upsert(&self, shard: &ShardStore, member: Member) -> CacheResult<()> {
        self.state.user_add(member.user.clone());
        shard.member_add(member)
    }

    /// Guild whose history a message event touches, or `None` when the event
    /// should be skipped.
    fn history_guild(&self, shard: &ShardStore, guild_id: Option<&str>) -> Option<String> {
        if shard.max_message_count() == 0 {
            return None;
        }
        guild_id.map(str::to_string)
    }

    fn message_delete_bulk(
        &self,
        shard: &ShardStore,
        event: MessageDeleteBulkEvent,
    ) -> CacheResult<DispatchOutcome> {
        let Some(guild_id) = self.history_guild(shard, event.guild_id.as_deref()) else {
            return Ok(DispatchOutcome::Skipped);
        };

        let mut outcome = DispatchOutcome::Skipped;
        for id in &event.ids {
            if benign(shard.message_remove_by_id(&guild_id, &event.channel_id, id))?
                == DispatchOutcome::Applied
            {
                outcome = DispatchOutcome::Applied;
            }
        }
        Ok(outcome)
    }
}

/// Treat a missing entity on removal as nothing to do.
fn benign(result: CacheResult<()>) -> CacheResult<DispatchOutcome> {
    match result {
        Ok(()) => Ok(DispatchOutcome::Applied),
        Err(CacheError::NotFound { .. }) => Ok(DispatchOutcome::Skipped),
        Err(e) => Err(e),
    }
}

fn private_channel_add(shard: &ShardStore, channel: &Channel) -> CacheResult<DispatchOutcome> {
    if channel.kind != ChannelType::Dm {
        return Ok(DispatchOutcome::Skipped);
    }
    for recipient in &channel.recipients {
        shard.add_private_channel(&recipient.id, &channel.id)?;
    }
    Ok(DispatchOutcome::Applied)
}

fn private_channel_remove(shard: &ShardStore, channel: &Channel) -> CacheResult<DispatchOutcome> {
    if channel.kind != ChannelType::Dm {
        return Ok(DispatchOutcome::Skipped);
    }
    let mut outcome = DispatchOutcome::Skipped;
    for recipient in &channel.recipients {
        if shard.remove_private_channel(&recipient.id)?.is_some() {
            outcome = DispatchOutcome::Applied;
        }
    }
    Ok(outcome)
}
