//! # Configuration Module
//!
//! Cache sizing and logging options. Sources, lowest priority first:
//! - Built-in defaults (50 messages per channel, one shard)
//! - `config/default.toml`, then `config/{RUN_ENV}.toml`
//! - `APP__` environment variables, e.g. `APP__CACHE__MAX_MESSAGE_COUNT=0`
//! - `SHARD_COUNT`
//!
//! A `.env` file is read first via dotenvy.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gateway_state::config::Settings;
//! use gateway_state::infrastructure::cache::State;
//!
//! let settings = Settings::load().unwrap();
//! let state = State::from_settings(&settings.cache);
//! assert_eq!(state.shard_count() as u32, settings.cache.shard_count);
//! ```

mod settings;

pub use settings::*;
