//! TOML configuration schema for the wireline client.
//!
//! All fields carry sensible defaults via `#[serde(default)]`, so an empty
//! file (or no file at all) yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Default remote host.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default remote TCP port.
fn default_port() -> u16 {
    5000
}

/// Default bound (milliseconds) on the disconnect wait for the receive task.
fn default_disconnect_timeout_ms() -> u64 {
    500
}

/// Client configuration.
///
/// Corresponds to the TOML file structure:
/// ```toml
/// host = "127.0.0.1"
/// port = 5000
/// disconnect_timeout_ms = 500
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Target address to connect to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Target TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum milliseconds disconnect waits for the receive task to finish
    /// before detaching it.
    #[serde(default = "default_disconnect_timeout_ms")]
    pub disconnect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            disconnect_timeout_ms: default_disconnect_timeout_ms(),
        }
    }
}
