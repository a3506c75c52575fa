//! Shard Store
//!
//! State for one gateway shard: its guilds, the per-guild member maps and the
//! user → DM channel map. A single reader/writer lock guards all of it,
//! including the role/channel/message/emoji/voice sequences nested inside
//! each guild. Queries take the lock in shared mode, mutations exclusively,
//! and every operation takes it exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::domain::entities::{
    Channel, Emoji, Guild, GuildPatch, Member, Message, MessagePatch, Role, VoiceState,
};
use crate::infrastructure::metrics;
use crate::shared::{shared, CacheError, CacheResult, EntityKind, Shared};

/// Messages retained per channel unless configured otherwise.
pub const DEFAULT_MAX_MESSAGE_COUNT: usize = 50;

/// The maps guarded by the shard lock.
#[derive(Debug, Default)]
struct ShardData {
    guilds: HashMap<String, Shared<Guild>>,
    /// guild ID -> user ID -> member; an entry exists for every cached guild
    members: HashMap<String, HashMap<String, Shared<Member>>>,
    /// user ID -> DM channel ID
    private_channels: HashMap<String, String>,
}

impl ShardData {
    fn guild(&self, guild_id: &str) -> CacheResult<&Shared<Guild>> {
        self.guilds
            .get(guild_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Guild, guild_id))
    }

    fn guild_members(&self, guild_id: &str) -> CacheResult<&HashMap<String, Shared<Member>>> {
        self.members
            .get(guild_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Guild, guild_id))
    }

    fn guild_add(&mut self, mut patch: GuildPatch) {
        let embedded = patch.strip_embedded();

        // The member map is authoritative: the GUILD_CREATE snapshot only
        // seeds members we have not heard about yet.
        let members = self.members.entry(patch.id.clone()).or_default();
        for mut member in embedded {
            if member.guild_id.is_empty() {
                member.guild_id = patch.id.clone();
            }
            members
                .entry(member.user.id.clone())
                .or_insert_with(|| shared(member));
        }

        match self.guilds.get(&patch.id) {
            Some(existing) => existing.update(|guild| guild.merge_from(patch)),
            None => {
                self.guilds.insert(patch.id.clone(), shared(Guild::from(patch)));
            }
        }
    }

    fn guild_remove(&mut self, guild_id: &str) -> CacheResult<()> {
        self.guilds
            .remove(guild_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Guild, guild_id))?;
        self.members.remove(guild_id);
        Ok(())
    }

    /// Returns whether the member was not cached before.
    fn member_add(&mut self, member: Member) -> CacheResult<bool> {
        let members = self
            .members
            .get_mut(&member.guild_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Guild, &member.guild_id))?;

        match members.get(member.user_id()) {
            Some(existing) => {
                existing.update(|stored| stored.merge_from(member));
                Ok(false)
            }
            None => {
                members.insert(member.user.id.clone(), shared(member));
                Ok(true)
            }
        }
    }

    fn member_remove(&mut self, guild_id: &str, user_id: &str) -> CacheResult<()> {
        self.guild(guild_id)?;
        let members = self
            .members
            .get_mut(guild_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Guild, guild_id))?;
        members
            .remove(user_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Member, user_id))?;
        Ok(())
    }

    fn member(&self, guild_id: &str, user_id: &str) -> CacheResult<&Shared<Member>> {
        self.guild_members(guild_id)?
            .get(user_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::Member, user_id))
    }

    fn adjust_member_count(&self, guild_id: &str, delta: i64) -> CacheResult<()> {
        self.guild(guild_id)?.update(|guild| {
            guild.member_count = guild.member_count.saturating_add_signed(delta);
        });
        Ok(())
    }

    fn role_remove(&mut self, guild_id: &str, role_id: &str) -> CacheResult<()> {
        self.guild(guild_id)?.update(|guild| -> CacheResult<()> {
            let index = guild
                .roles
                .iter()
                .position(|r| r.id == role_id)
                .ok_or_else(|| CacheError::not_found(EntityKind::Role, role_id))?;
            guild.roles.remove(index);
            Ok(())
        })
    }

    fn channel_remove(&mut self, guild_id: &str, channel_id: &str) -> CacheResult<()> {
        self.guild(guild_id)?.update(|guild| -> CacheResult<()> {
            let index = guild
                .channels
                .iter()
                .position(|c| c.read().id == channel_id)
                .ok_or_else(|| CacheError::not_found(EntityKind::Channel, channel_id))?;
            guild.channels.remove(index);
            Ok(())
        })
    }

    fn channel(&self, guild_id: &str, channel_id: &str) -> CacheResult<Shared<Channel>> {
        self.guild(guild_id)?
            .read()
            .channel(channel_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::Channel, channel_id))
    }

    fn emoji_remove(&mut self, guild_id: &str, emoji_id: &str) -> CacheResult<()> {
        self.guild(guild_id)?.update(|guild| -> CacheResult<()> {
            let index = guild
                .emojis
                .iter()
                .position(|e| e.id == emoji_id)
                .ok_or_else(|| CacheError::not_found(EntityKind::Emoji, emoji_id))?;
            guild.emojis.remove(index);
            Ok(())
        })
    }

    fn message(&self, guild_id: &str, channel_id: &str, message_id: &str) -> CacheResult<Shared<Message>> {
        let channel = self.channel(guild_id, channel_id)?.read();
        channel
            .message(message_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::Message, message_id))
    }

    /// Returns how many old messages were evicted.
    fn message_add(&mut self, guild_id: &str, message: Message, max: usize) -> CacheResult<usize> {
        let channel = self.channel(guild_id, &message.channel_id)?;

        let existing = channel.read().message(&message.id).cloned();
        if let Some(existing) = existing {
            existing.update(|stored| stored.apply(MessagePatch::from(message)));
            return Ok(0);
        }

        Ok(channel.update(|channel| channel.push_message(shared(message), max)))
    }

    fn message_update(&mut self, guild_id: &str, patch: MessagePatch) -> CacheResult<()> {
        let message = self.message(guild_id, &patch.channel_id, &patch.id)?;
        message.update(|stored| stored.apply(patch));
        Ok(())
    }

    fn message_remove(&mut self, guild_id: &str, channel_id: &str, message_id: &str) -> CacheResult<()> {
        self.channel(guild_id, channel_id)?.update(|channel| -> CacheResult<()> {
            let index = channel
                .messages
                .iter()
                .position(|m| m.read().id == message_id)
                .ok_or_else(|| CacheError::not_found(EntityKind::Message, message_id))?;
            channel.messages.remove(index);
            Ok(())
        })
    }

    fn voice_state_update(&mut self, state: VoiceState) -> CacheResult<()> {
        self.guild(&state.guild_id)?.update(|guild| {
            let existing = guild
                .voice_states
                .iter()
                .position(|v| v.user_id == state.user_id);

            match (state.is_connected(), existing) {
                // Left voice
                (false, Some(index)) => {
                    guild.voice_states.remove(index);
                }
                (false, None) => {}
                (true, Some(index)) => guild.voice_states[index] = Arc::new(state),
                (true, None) => guild.voice_states.push(Arc::new(state)),
            }
        });
        Ok(())
    }
}

/// Cached state for one gateway shard.
///
/// Query results are handles onto the live records, not copies: a handle
/// keeps observing updates until the entity is removed. Reading a handle
/// yields a snapshot and holds no lock, so consumers may keep snapshots while
/// calling back into the store.
#[derive(Debug)]
pub struct ShardStore {
    shard_id: u32,
    max_message_count: usize,
    /// `None` once the shard has been torn down
    data: RwLock<Option<ShardData>>,
}

impl ShardStore {
    /// Create an empty store keeping at most `max_message_count` messages per channel.
    pub fn new(shard_id: u32, max_message_count: usize) -> Self {
        Self {
            shard_id,
            max_message_count,
            data: RwLock::new(Some(ShardData::default())),
        }
    }

    pub fn shard_id(&self) -> u32 {
        self.shard_id
    }

    /// Maximum number of messages retained per channel.
    pub fn max_message_count(&self) -> usize {
        self.max_message_count
    }

    /// Drop all cached data; every later call fails with `NotInstantiated`.
    pub(crate) fn tear_down(&self) {
        *self.data.write() = None;
    }

    /// Whether the store is still registered and holding data.
    pub fn is_live(&self) -> bool {
        self.data.read().is_some()
    }

    fn read(&self) -> CacheResult<MappedRwLockReadGuard<'_, ShardData>> {
        RwLockReadGuard::try_map(self.data.read(), |data| data.as_ref())
            .map_err(|_| CacheError::NotInstantiated)
    }

    fn write(&self) -> CacheResult<MappedRwLockWriteGuard<'_, ShardData>> {
        RwLockWriteGuard::try_map(self.data.write(), |data| data.as_mut())
            .map_err(|_| CacheError::NotInstantiated)
    }

    // --- Guilds ---

    /// Add a guild from a GUILD_CREATE / GUILD_UPDATE payload.
    ///
    /// The embedded member, presence and thread lists are stripped. If the
    /// guild is already cached, the collections the payload omits are kept
    /// and the stored record is updated in place, so existing handles see the
    /// new state.
    pub fn guild_add(&self, guild: GuildPatch) -> CacheResult<()> {
        self.write()?.guild_add(guild);
        metrics::record_mutation("guild", "add");
        Ok(())
    }

    /// Remove a guild together with its member map.
    pub fn guild_remove(&self, guild_id: &str) -> CacheResult<()> {
        self.write()?.guild_remove(guild_id)?;
        metrics::record_mutation("guild", "remove");
        Ok(())
    }

    pub fn guild(&self, guild_id: &str) -> CacheResult<Shared<Guild>> {
        self.read()?.guild(guild_id).cloned()
    }

    /// All cached guilds, in no particular order.
    pub fn guilds(&self) -> CacheResult<Vec<Shared<Guild>>> {
        Ok(self.read()?.guilds.values().cloned().collect())
    }

    pub fn guild_count(&self) -> CacheResult<usize> {
        Ok(self.read()?.guilds.len())
    }

    /// Shift the guild's reported member count by `delta`, saturating at zero.
    pub fn adjust_member_count(&self, guild_id: &str, delta: i64) -> CacheResult<()> {
        self.write()?.adjust_member_count(guild_id, delta)?;
        metrics::record_mutation("guild", "update");
        Ok(())
    }

    // --- Members ---

    /// Insert or update a member.
    ///
    /// An update without a join time keeps the one already known.
    pub fn member_add(&self, member: Member) -> CacheResult<()> {
        self.write()?.member_add(member)?;
        metrics::record_mutation("member", "add");
        Ok(())
    }

    pub fn member_remove(&self, guild_id: &str, user_id: &str) -> CacheResult<()> {
        self.write()?.member_remove(guild_id, user_id)?;
        metrics::record_mutation("member", "remove");
        Ok(())
    }

    /// Record a member joining the guild.
    ///
    /// The guild's member count grows only when the member was not cached
    /// yet; both changes happen under one write lock. Returns whether the
    /// member was new.
    pub fn member_join(&self, member: Member) -> CacheResult<bool> {
        let mut data = self.write()?;
        let guild_id = member.guild_id.clone();
        let joined = data.member_add(member)?;
        if joined {
            data.adjust_member_count(&guild_id, 1)?;
        }
        metrics::record_mutation("member", "add");
        Ok(joined)
    }

    /// Record a member leaving the guild, shrinking its member count under
    /// the same write lock.
    pub fn member_leave(&self, guild_id: &str, user_id: &str) -> CacheResult<()> {
        let mut data = self.write()?;
        data.member_remove(guild_id, user_id)?;
        data.adjust_member_count(guild_id, -1)?;
        metrics::record_mutation("member", "remove");
        Ok(())
    }

    pub fn member(&self, guild_id: &str, user_id: &str) -> CacheResult<Shared<Member>> {
        self.read()?.member(guild_id, user_id).cloned()
    }

    /// The guild's member list, ordered by user ID.
    pub fn members(&self, guild_id: &str) -> CacheResult<Vec<Shared<Member>>> {
        let data = self.read()?;
        data.guild(guild_id)?;
        let mut members: Vec<_> = data.guild_members(guild_id)?.values().cloned().collect();
        members.sort_by_cached_key(|m| m.read().user.id.clone());
        Ok(members)
    }

    // --- Roles ---

    /// Replace the role with the same ID, or append it.
    pub fn role_add(&self, guild_id: &str, role: Role) -> CacheResult<()> {
        self.write()?.guild(guild_id)?.update(|guild| guild.upsert_role(role));
        metrics::record_mutation("role", "add");
        Ok(())
    }

    pub fn role_remove(&self, guild_id: &str, role_id: &str) -> CacheResult<()> {
        self.write()?.role_remove(guild_id, role_id)?;
        metrics::record_mutation("role", "remove");
        Ok(())
    }

    pub fn role(&self, guild_id: &str, role_id: &str) -> CacheResult<Arc<Role>> {
        self.read()?
            .guild(guild_id)?
            .read()
            .role(role_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::Role, role_id))
    }

    // --- Channels ---

    /// Add a channel to a guild, or update the cached one in place.
    ///
    /// The retained message history of an existing channel is kept.
    pub fn channel_add(&self, guild_id: &str, mut channel: Channel) -> CacheResult<()> {
        channel.guild_id.get_or_insert_with(|| guild_id.to_string());
        self.write()?
            .guild(guild_id)?
            .update(|guild| guild.upsert_channel(channel));
        metrics::record_mutation("channel", "add");
        Ok(())
    }

    pub fn channel_remove(&self, guild_id: &str, channel_id: &str) -> CacheResult<()> {
        self.write()?.channel_remove(guild_id, channel_id)?;
        metrics::record_mutation("channel", "remove");
        Ok(())
    }

    pub fn channel(&self, guild_id: &str, channel_id: &str) -> CacheResult<Shared<Channel>> {
        self.read()?.channel(guild_id, channel_id)
    }

    // --- Emoji ---

    /// Replace the emoji with the same ID, or append it.
    pub fn emoji_add(&self, guild_id: &str, emoji: Emoji) -> CacheResult<()> {
        self.write()?.guild(guild_id)?.update(|guild| guild.upsert_emoji(emoji));
        metrics::record_mutation("emoji", "add");
        Ok(())
    }

    /// Replace the guild's whole emoji list.
    pub fn emojis_update(&self, guild_id: &str, emojis: Vec<Emoji>) -> CacheResult<()> {
        let emojis: Vec<_> = emojis.into_iter().map(Arc::new).collect();
        self.write()?
            .guild(guild_id)?
            .update(|guild| guild.emojis = emojis);
        metrics::record_mutation("emoji", "update");
        Ok(())
    }

    pub fn emoji_remove(&self, guild_id: &str, emoji_id: &str) -> CacheResult<()> {
        self.write()?.emoji_remove(guild_id, emoji_id)?;
        metrics::record_mutation("emoji", "remove");
        Ok(())
    }

    pub fn emoji(&self, guild_id: &str, emoji_id: &str) -> CacheResult<Arc<Emoji>> {
        self.read()?
            .guild(guild_id)?
            .read()
            .emoji(emoji_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::Emoji, emoji_id))
    }

    /// Look an emoji up by name; static and animated emoji with the same name
    /// are distinct.
    pub fn emoji_by_name(&self, guild_id: &str, name: &str, animated: bool) -> CacheResult<Arc<Emoji>> {
        self.read()?
            .guild(guild_id)?
            .read()
            .emojis
            .iter()
            .find(|e| e.name == name && e.animated == animated)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::Emoji, name))
    }

    // --- Messages ---

    /// Add a message to its channel's history.
    ///
    /// A message whose ID is already retained is merged in place (only the
    /// fields the new copy carries) and the history does not grow. Otherwise
    /// it is appended and the oldest messages are evicted down to
    /// `max_message_count`.
    pub fn message_add(&self, guild_id: &str, message: Message) -> CacheResult<()> {
        let evicted = self
            .write()?
            .message_add(guild_id, message, self.max_message_count)?;
        metrics::record_mutation("message", "add");
        metrics::record_evictions(evicted);
        Ok(())
    }

    /// Apply a partial update to a retained message.
    pub fn message_update(&self, guild_id: &str, patch: MessagePatch) -> CacheResult<()> {
        self.write()?.message_update(guild_id, patch)?;
        metrics::record_mutation("message", "update");
        Ok(())
    }

    pub fn message_remove(&self, guild_id: &str, message: &Message) -> CacheResult<()> {
        self.message_remove_by_id(guild_id, &message.channel_id, &message.id)
    }

    pub fn message_remove_by_id(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> CacheResult<()> {
        self.write()?.message_remove(guild_id, channel_id, message_id)?;
        metrics::record_mutation("message", "remove");
        Ok(())
    }

    pub fn message(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> CacheResult<Shared<Message>> {
        self.read()?.message(guild_id, channel_id, message_id)
    }

    // --- Voice ---

    /// Record a voice state. A state without a channel removes the user's
    /// entry (and succeeds if there was none); otherwise the user's entry is
    /// replaced or appended.
    pub fn voice_state_update(&self, state: VoiceState) -> CacheResult<()> {
        self.write()?.voice_state_update(state)?;
        metrics::record_mutation("voice_state", "update");
        Ok(())
    }

    pub fn voice_state(&self, guild_id: &str, user_id: &str) -> CacheResult<Arc<VoiceState>> {
        self.read()?
            .guild(guild_id)?
            .read()
            .voice_state(user_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::VoiceState, user_id))
    }

    // --- Private channels ---

    /// DM channel ID for a user, if one is known.
    pub fn private_channel(&self, user_id: &str) -> CacheResult<Option<String>> {
        Ok(self.read()?.private_channels.get(user_id).cloned())
    }

    pub fn add_private_channel(&self, user_id: &str, channel_id: &str) -> CacheResult<()> {
        self.write()?
            .private_channels
            .insert(user_id.to_string(), channel_id.to_string());
        Ok(())
    }

    /// Forget a user's DM channel, returning the one that was mapped.
    pub fn remove_private_channel(&self, user_id: &str) -> CacheResult<Option<String>> {
        Ok(self.write()?.private_channels.remove(user_id))
    }
}
