//! Cache Error Types
//!
//! Centralized error handling for the state cache.

use std::fmt;

/// Kind of cached entity a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Guild,
    Member,
    Role,
    Channel,
    Message,
    VoiceState,
    Emoji,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Guild => "guild",
            Self::Member => "member",
            Self::Role => "role",
            Self::Channel => "channel",
            Self::Message => "message",
            Self::VoiceState => "voice_state",
            Self::Emoji => "emoji",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State cache error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The store was never created, or has been torn down.
    #[error("state not instantiated, create the shard before using it")]
    NotInstantiated,

    #[error("state cache not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: String },
}

impl CacheError {
    /// Build a `NotFound` error for the given entity.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether this error reports a missing entity (as opposed to a missing store).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The entity kind of a `NotFound` error.
    pub fn missing_kind(&self) -> Option<EntityKind> {
        match self {
            Self::NotFound { kind, .. } => Some(*kind),
            Self::NotInstantiated => None,
        }
    }
}

/// Result alias used throughout the cache.
pub type CacheResult<T> = Result<T, CacheError>;
