//! Application-level configuration.
//!
//! - [`TwoStageConfig`]: profiles, triage model and trigger marker for a two-stage run

pub mod two_stage_config;

pub use two_stage_config::TwoStageConfig;
