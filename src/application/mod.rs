//! Application Layer
//!
//! Turns decoded gateway events into cache mutations. The stores themselves
//! live in the infrastructure layer.

pub mod dispatcher;

pub use dispatcher::{DispatchOutcome, EventDispatcher};
