//! # Gateway State
//!
//! This crate provides the in-memory state cache of a real-time messaging
//! gateway client:
//! - A global user directory and shard table
//! - One store per gateway shard holding guilds, members, channels and
//!   bounded per-channel message history
//! - An event dispatcher applying decoded gateway events
//!
//! ## Architecture
//!
//! - **Domain Layer**: Cached entities, partial-update patches and events
//! - **Application Layer**: Event dispatch
//! - **Infrastructure Layer**: Global and shard stores, Prometheus metrics
//!
//! ## Module Structure
//!
//! ```text
//! gateway_state/
//! +-- config/         Configuration management
//! +-- domain/         Entities, patches and decoded events
//! +-- application/    Event dispatcher
//! +-- infrastructure/ Cache stores and metrics
//! +-- shared/         Errors and shared record handles
//! ```

// Configuration module
pub mod config;

// Domain layer - Cached entities and events
pub mod domain;

// Application layer - Event dispatch
pub mod application;

// Infrastructure layer - Stores and metrics
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Telemetry and observability
pub mod telemetry;
