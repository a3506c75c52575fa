//! # Domain Entities
//!
//! Records the cache keeps for one gateway connection.
//!
//! ## Core Entities
//!
//! - **User**: Global identity, shared across shards
//! - **Guild**: A community holding channels, roles, emoji and voice states
//! - **Member**: A user's membership in a specific guild
//! - **Channel**: A guild or DM channel with its bounded message history
//! - **Message**: A message retained in a channel's history
//! - **Role**, **Emoji**, **VoiceState**: Guild-scoped sequences
//!
//! ## Patches
//!
//! `GuildPatch` and `MessagePatch` describe partial updates. Their optional
//! fields mark what an event actually carried, which is what the merge rules
//! key on.

mod attachment;
mod channel;
mod emoji;
mod guild;
mod member;
mod message;
mod role;
mod user;
mod voice_state;

pub use attachment::Attachment;
pub use channel::{Channel, ChannelType};
pub use emoji::Emoji;
pub use guild::{Guild, GuildPatch};
pub use member::Member;
pub use message::{Embed, Message, MessageComponent, MessagePatch};
pub use role::Role;
pub use user::User;
pub use voice_state::VoiceState;
