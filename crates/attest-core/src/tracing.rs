//! Tracing bootstrap.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber, filtered by `ATTEST_LOG` (falling
/// back to `info`). Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("ATTEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
