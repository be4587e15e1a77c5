/// Configuration error types.
pub mod error;

/// Configuration file loader.
pub mod loader;

/// TOML configuration schema types.
pub mod schema;

pub use error::ConfigError;
pub use loader::{load, load_or_default};
pub use schema::Config;
