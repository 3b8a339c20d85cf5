//! Two-stage run parameters.
//!
//! [`TwoStageConfig`] names the profiles, the triage model override and the
//! trigger marker used by
//! [`RunTwoStageUseCase`](crate::use_cases::run_two_stage::RunTwoStageUseCase).
//!
//! The shape of a run is fixed: the triage session always receives the model
//! override, the detailed session never does.

use casematch_domain::{ModelSpec, ProfileId, TriggerMarker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoStageConfig {
    /// Profile answering the first exchange.
    pub triage_profile: ProfileId,
    /// Profile answering the second exchange.
    pub detailed_profile: ProfileId,
    /// Model override applied to every triage session.
    pub triage_model: ModelSpec,
    /// Marker in the triage answer that triggers the second exchange.
    pub marker: TriggerMarker,
}

impl Default for TwoStageConfig {
    fn default() -> Self {
        Self {
            triage_profile: ProfileId::TRIAGE,
            detailed_profile: ProfileId::DETAILED,
            triage_model: ModelSpec::triage_default(),
            marker: TriggerMarker::default(),
        }
    }
}

impl TwoStageConfig {
    // ==================== Builder Methods ====================

    pub fn with_triage_profile(mut self, profile: ProfileId) -> Self {
        self.triage_profile = profile;
        self
    }

    pub fn with_detailed_profile(mut self, profile: ProfileId) -> Self {
        self.detailed_profile = profile;
        self
    }

    pub fn with_triage_model(mut self, model: ModelSpec) -> Self {
        self.triage_model = model;
        self
    }

    pub fn with_marker(mut self, marker: TriggerMarker) -> Self {
        self.marker = marker;
        self
    }
}
