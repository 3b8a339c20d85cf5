//! Infrastructure layer for casematch
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod backend;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backend::{BackendError, HttpChatBackend};
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileProfilesConfig, FileTriggerConfig,
};
pub use logging::JsonlExchangeLogger;
