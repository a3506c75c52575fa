//! # Domain Layer
//!
//! Entity records and the decoded gateway events that mutate them.
//!
//! ## Structure
//!
//! - **entities**: User, Guild, Member, Channel, Message, Role, Emoji, VoiceState
//! - **events**: Decoded gateway dispatch events (`CacheEvent`)
//!
//! Nothing in here knows about locking or shards; that lives in
//! `infrastructure::cache`.

pub mod entities;
pub mod events;

// Re-export commonly used types
pub use entities::*;
pub use events::CacheEvent;
