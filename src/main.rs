//! # State Replay
//!
//! Replays a recorded gateway event stream into a fresh state cache.
//!
//! This is the binary entry point that initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - The configured shard stores
//!
//! Input is JSON lines of `{"shard": 0, "event": {"t": "...", "d": {...}}}`,
//! read from the file named by the first argument or from stdin. The final
//! Prometheus metrics are written to stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use gateway_state::application::{DispatchOutcome, EventDispatcher};
use gateway_state::config::Settings;
use gateway_state::domain::CacheEvent;
use gateway_state::infrastructure::cache::State;
use gateway_state::infrastructure::metrics;

/// One recorded dispatch
#[derive(Debug, Deserialize)]
struct Dispatch {
    shard: u32,
    event: CacheEvent,
}

#[derive(Debug, Default)]
struct ReplaySummary {
    applied: usize,
    skipped: usize,
    failed: usize,
    malformed: usize,
}

fn main() -> Result<()> {
    // Load configuration from environment and config files
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    gateway_state::telemetry::init_tracing(&settings.log);

    info!(
        environment = %settings.environment,
        shard_count = settings.cache.shard_count,
        max_message_count = settings.cache.max_message_count,
        "Configuration loaded"
    );

    let state = Arc::new(State::from_settings(&settings.cache));
    let dispatcher = EventDispatcher::new(Arc::clone(&state));

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let summary = replay(&dispatcher, input)?;

    let mut guilds = 0;
    for shard_id in state.shard_ids() {
        guilds += state.shard(shard_id)?.guild_count()?;
    }

    info!(
        applied = summary.applied,
        skipped = summary.skipped,
        failed = summary.failed,
        malformed = summary.malformed,
        guilds,
        users = state.user_count(),
        "Replay finished"
    );

    print!("{}", metrics::gather_metrics());

    Ok(())
}

fn replay(dispatcher: &EventDispatcher, input: impl BufRead) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read event stream")?;
        if line.trim().is_empty() {
            continue;
        }

        let record: Dispatch = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed record");
                summary.malformed += 1;
                continue;
            }
        };

        let name = record.event.event_name();
        match dispatcher.dispatch(record.shard, record.event) {
            Ok(DispatchOutcome::Applied) => summary.applied += 1,
            Ok(DispatchOutcome::Skipped) => summary.skipped += 1,
            Err(e) => {
                warn!(line = index + 1, shard = record.shard, event = name, error = %e, "Event not applied");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
