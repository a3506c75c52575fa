//! Shared Utilities
//!
//! Common utilities used across all layers.

pub mod error;
pub mod handle;

pub use error::{CacheError, CacheResult, EntityKind};
pub(crate) use handle::shared;
pub use handle::Shared;
