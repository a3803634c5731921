//! Process-wide configuration for ferrule.
//!
//! Settings come from an optional `ferrule.toml`, then `FERRULE_*`
//! environment variables override individual keys. The result is an
//! immutable [`FerruleConfig`] handed to the build machinery at startup.

#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod loader;
pub mod types;

pub use env::{apply_env, apply_env_with};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::FerruleConfig;
