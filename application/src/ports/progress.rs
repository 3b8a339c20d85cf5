//! Progress notification port
//!
//! Defines the interface for reporting progress while a two-stage run is
//! driven to completion by [`RunTwoStageUseCase::execute`](crate::use_cases::run_two_stage::RunTwoStageUseCase::execute).

use casematch_domain::{Answer, Stage};
use serde_json::Value;

/// Callback for progress updates during a two-stage run
///
/// Implementations live in the presentation layer.
pub trait StageProgressNotifier: Send + Sync {
    /// Called before a stage's session is created
    fn on_stage_start(&self, stage: Stage);

    /// Called for each answer fragment as it arrives.
    fn on_answer_piece(&self, _stage: Stage, _piece: &str) {}

    /// Called for each source reference as it arrives.
    fn on_source(&self, _stage: Stage, _info: &Value) {}

    /// Called once a stage's stream has been fully drained
    fn on_stage_complete(&self, stage: Stage, answer: &Answer);

    /// Called after the trigger marker has been checked against the triage answer.
    fn on_trigger_checked(&self, _triggered: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl StageProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _answer: &Answer) {}
}
