//! Two-stage triage concepts.
//!
//! A query is first answered under the triage profile. If the assembled
//! answer contains the [`marker::TriggerMarker`], the same query is asked
//! again under the detailed profile.

pub mod marker;
pub mod stage;
