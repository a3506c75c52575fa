//! Cache Module
//!
//! In-memory gateway state, split the same way the gateway connection is:
//!
//! ```text
//! +---------------------------+
//! |          State            |  users + shard table (own lock)
//! +---------------------------+
//!      |            |
//!      v            v
//! +-----------+ +-----------+
//! | Shard 0   | | Shard 1   |    guilds, member maps, DM channels
//! +-----------+ +-----------+    (one lock per shard)
//! ```
//!
//! # Lock order
//!
//! Shard lock, then guild, then channel, then message. Writers only lock a
//! record while holding its shard's write lock. Consumers holding a record
//! guard must release it before calling back into the cache.
//!
//! # Example
//!
//! ```rust
//! use gateway_state::domain::{Channel, GuildPatch, Message};
//! use gateway_state::infrastructure::cache::State;
//!
//! let state = State::with_max_message_count(2);
//! let shard = state.create_shard(0);
//! shard.guild_add(GuildPatch::new("g1")).unwrap();
//! shard.channel_add("g1", Channel::new("c1", "general")).unwrap();
//!
//! for id in ["m1", "m2", "m3"] {
//!     shard.message_add("g1", Message::new(id, "c1", "hi")).unwrap();
//! }
//!
//! let channel = shard.channel("g1", "c1").unwrap();
//! assert_eq!(channel.read().message_ids(), vec!["m2", "m3"]);
//! ```

mod shard;
mod state;

pub use shard::{ShardStore, DEFAULT_MAX_MESSAGE_COUNT};
pub use state::State;
