//! Application layer for casematch
//!
//! This crate contains the two-stage use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::TwoStageConfig;
pub use ports::{
    chat_backend::{ChatBackend, GatewayError, PacketStream},
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    progress::{NoProgress, StageProgressNotifier},
};
pub use use_cases::run_two_stage::{
    RunTwoStageInput, RunTwoStageUseCase, SecondStage, TwoStageOutcome, TwoStageRun,
};
