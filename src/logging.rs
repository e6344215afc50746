//! Diagnostic logging setup for the binaries
//!
//! All diagnostics go to stderr so stdout carries nothing but result links.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber writing to stderr.
///
/// The level comes from `RUST_LOG`, defaulting to `info`. Calling this twice
/// is harmless; the second call is ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
