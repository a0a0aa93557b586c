//! Structured logging with tracing
//!
//! Diagnostics go to stderr so the report JSON on stdout stays clean for the
//! downstream renderer. `RUST_LOG` overrides the configured default filter.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
