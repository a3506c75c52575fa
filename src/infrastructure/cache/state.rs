//! Global Store
//!
//! Owns the cross-shard user directory and the shard table. Its lock is
//! independent of every shard lock, so user updates never contend with
//! guild, member or message traffic.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::shard::{ShardStore, DEFAULT_MAX_MESSAGE_COUNT};
use crate::config::CacheSettings;
use crate::domain::entities::User;
use crate::infrastructure::metrics;
use crate::shared::{shared, CacheError, CacheResult, EntityKind, Shared};

#[derive(Debug, Default)]
struct StateData {
    users: HashMap<String, Shared<User>>,
    shards: HashMap<u32, Arc<ShardStore>>,
}

/// Root of the cache: users plus one `ShardStore` per gateway shard.
#[derive(Debug)]
pub struct State {
    max_message_count: usize,
    inner: RwLock<StateData>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Create an empty state whose shards keep the default message history.
    pub fn new() -> Self {
        Self::with_max_message_count(DEFAULT_MAX_MESSAGE_COUNT)
    }

    /// Create an empty state whose shards keep `max_message_count` messages per channel.
    pub fn with_max_message_count(max_message_count: usize) -> Self {
        Self {
            max_message_count,
            inner: RwLock::new(StateData::default()),
        }
    }

    /// Create a state from settings and register the configured shards.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let state = Self::with_max_message_count(settings.max_message_count);
        for shard_id in 0..settings.shard_count {
            state.create_shard(shard_id);
        }
        state
    }

    /// History size given to newly created shards.
    pub fn max_message_count(&self) -> usize {
        self.max_message_count
    }

    // --- Users ---

    /// Insert a user, or overwrite the cached record in place.
    pub fn user_add(&self, user: User) -> Shared<User> {
        let mut inner = self.inner.write();
        match inner.users.get(&user.id) {
            Some(existing) => {
                existing.replace(user);
                metrics::record_mutation("user", "update");
                existing.clone()
            }
            None => {
                let id = user.id.clone();
                let handle = shared(user);
                inner.users.insert(id, handle.clone());
                metrics::record_mutation("user", "add");
                handle
            }
        }
    }

    pub fn user(&self, user_id: &str) -> CacheResult<Shared<User>> {
        self.inner
            .read()
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| CacheError::not_found(EntityKind::User, user_id))
    }

    pub fn user_remove(&self, user_id: &str) -> CacheResult<()> {
        self.inner
            .write()
            .users
            .remove(user_id)
            .ok_or_else(|| CacheError::not_found(EntityKind::User, user_id))?;
        metrics::record_mutation("user", "remove");
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    // --- Shards ---

    /// Register a fresh store for `shard_id` with the configured history size.
    ///
    /// A store already registered under the same index is torn down and
    /// replaced; the last call wins.
    pub fn create_shard(&self, shard_id: u32) -> Arc<ShardStore> {
        self.create_shard_with_max_messages(shard_id, self.max_message_count)
    }

    pub fn create_shard_with_max_messages(
        &self,
        shard_id: u32,
        max_message_count: usize,
    ) -> Arc<ShardStore> {
        let store = Arc::new(ShardStore::new(shard_id, max_message_count));

        let mut inner = self.inner.write();
        if let Some(previous) = inner.shards.insert(shard_id, Arc::clone(&store)) {
            previous.tear_down();
            debug!(shard_id, "Replaced existing shard store");
        }
        metrics::set_active_shards(inner.shards.len());

        info!(shard_id, max_message_count, "Shard store created");
        store
    }

    /// Look up the store for `shard_id`.
    ///
    /// Fails with `NotInstantiated` when the shard was never created.
    pub fn shard(&self, shard_id: u32) -> CacheResult<Arc<ShardStore>> {
        self.inner
            .read()
            .shards
            .get(&shard_id)
            .cloned()
            .ok_or(CacheError::NotInstantiated)
    }

    /// Unregister and tear down a shard store.
    pub fn remove_shard(&self, shard_id: u32) -> CacheResult<()> {
        let mut inner = self.inner.write();
        let store = inner
            .shards
            .remove(&shard_id)
            .ok_or(CacheError::NotInstantiated)?;
        store.tear_down();
        metrics::set_active_shards(inner.shards.len());

        info!(shard_id, "Shard store removed");
        Ok(())
    }

    pub fn shard_count(&self) -> usize {
        self.inner.read().shards.len()
    }

    /// Registered shard indexes, ascending.
    pub fn shard_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.inner.read().shards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
