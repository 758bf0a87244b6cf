// crates/engine_core/src/logging.rs

use tracing::Level;

/// Install the fmt subscriber. Safe to call more than once; later calls are
/// ignored, which keeps tests that share a process from fighting over it.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
