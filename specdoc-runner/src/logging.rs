//! Diagnostic tracing for runs.
//!
//! The library only emits `tracing` events. Binaries and test suites that
//! want to see them call [`init`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact stderr subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
///
/// ```bash
/// RUST_LOG=specdoc_runner=debug cargo test
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
