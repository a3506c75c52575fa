//! Infrastructure Layer
//!
//! Contains the concrete stores behind the cache:
//! - Global and per-shard state stores
//! - Prometheus metrics

pub mod cache;
pub mod metrics;
