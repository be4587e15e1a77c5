//! Logging initialization for the wireline client.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `WIRELINE_LOG` environment variable. Falls back to `info` level when the
//! variable is unset.
//!
//! # Usage
//!
//! ```bash
//! # Default (info level)
//! wireline
//!
//! # Debug level
//! WIRELINE_LOG=debug wireline
//!
//! # Module-specific filtering
//! WIRELINE_LOG=wireline=trace,warn wireline
//! ```

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads the `WIRELINE_LOG` environment variable for filter directives.
/// Falls back to `info` level when the variable is unset or invalid.
///
/// Output is written to stderr so received payloads printed on stdout stay
/// clean for piping.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (should only be
/// called once, at process startup).
pub fn init() {
    let filter = EnvFilter::try_from_env("WIRELINE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
