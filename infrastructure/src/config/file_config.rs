//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Values are kept raw here and parsed into domain types by
//! [`FileConfig::to_two_stage_config`].

use casematch_application::TwoStageConfig;
use casematch_domain::{ModelSpec, ProfileId, TriggerMarker};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("backend.base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),

    #[error("backend.connect_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("profiles.triage_model is invalid: {0}")]
    InvalidModel(String),

    #[error("trigger.marker cannot be empty")]
    EmptyMarker,
}

/// Raw backend connection settings from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the chat backend
    pub base_url: String,
    /// Connect timeout in seconds (none = HTTP client default)
    pub connect_timeout_seconds: Option<u64>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout_seconds: None,
        }
    }
}

impl FileBackendConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_seconds.map(Duration::from_secs)
    }
}

/// Raw profile selection from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfilesConfig {
    /// Profile id for the triage exchange
    pub triage: i64,
    /// Profile id for the detailed exchange
    pub detailed: i64,
    /// Model override applied to the triage session ("name__provider__version")
    pub triage_model: String,
}

impl Default for FileProfilesConfig {
    fn default() -> Self {
        Self {
            triage: ProfileId::TRIAGE.value(),
            detailed: ProfileId::DETAILED.value(),
            triage_model: ModelSpec::triage_default().to_string(),
        }
    }
}

/// Raw trigger settings from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTriggerConfig {
    /// Substring in the triage answer that escalates to the detailed stage
    pub marker: String,
}

impl Default for FileTriggerConfig {
    fn default() -> Self {
        Self {
            marker: TriggerMarker::CASE_INQUIRY.to_string(),
        }
    }
}

/// Raw logging settings from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of exchange events
    pub transcript: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend connection settings
    pub backend: FileBackendConfig,
    /// Profile and model selection
    pub profiles: FileProfilesConfig,
    /// Escalation trigger
    pub trigger: FileTriggerConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.backend.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(
                self.backend.base_url.clone(),
            ));
        }

        if let Some(0) = self.backend.connect_timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        self.parse_triage_model()?;
        self.parse_marker()?;
        Ok(())
    }

    /// Convert into the application's two-stage settings
    pub fn to_two_stage_config(&self) -> Result<TwoStageConfig, ConfigValidationError> {
        Ok(TwoStageConfig::default()
            .with_triage_profile(ProfileId::new(self.profiles.triage))
            .with_detailed_profile(ProfileId::new(self.profiles.detailed))
            .with_triage_model(self.parse_triage_model()?)
            .with_marker(self.parse_marker()?))
    }

    fn parse_triage_model(&self) -> Result<ModelSpec, ConfigValidationError> {
        self.profiles
            .triage_model
            .parse()
            .map_err(|e: casematch_domain::DomainError| {
                ConfigValidationError::InvalidModel(e.to_string())
            })
    }

    fn parse_marker(&self) -> Result<TriggerMarker, ConfigValidationError> {
        TriggerMarker::new(&self.trigger.marker).map_err(|_| ConfigValidationError::EmptyMarker)
    }
}
