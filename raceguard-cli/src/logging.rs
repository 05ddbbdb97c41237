//! Logging setup: CLI-level scaffolding around `tracing`, kept out of
//! `raceguard-core` since the analyzer itself has no opinion on how its
//! `trace!`/`warn!` calls get rendered.

use tracing_subscriber::EnvFilter;

/// Initializes `tracing` once, for the lifetime of the process.
///
/// Honors `RUST_LOG` via [`EnvFilter`]; defaults to `info` so a plain
/// `raceguard replay trace.jsonl` prints dropped-event warnings without
/// requiring the caller to set anything.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
