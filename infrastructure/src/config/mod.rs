//! Configuration file loading for casematch
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./casematch.toml` or `./.casematch.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/casematch/config.toml`
//! 4. Environment variables: `CASEMATCH_SECTION__KEY`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig, FileProfilesConfig,
    FileTriggerConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
