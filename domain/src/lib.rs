//! Domain layer for casematch
//!
//! This crate contains the value objects shared by every layer.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A backend chat session, identified by an opaque [`SessionId`] and bound to
//! a [`ProfileId`]. A session may carry one [`ModelSpec`] override.
//!
//! ## Packet
//!
//! Each exchange streams [`Packet`]s: answer fragments, source references and
//! one terminal marker. Folding them into an [`Answer`] reconstructs the text.
//!
//! ## Triage
//!
//! - **Triage stage**: fast classification of the query
//! - **Detailed stage**: run only when the triage answer contains the
//!   [`TriggerMarker`]

pub mod core;
pub mod session;
pub mod triage;

// Re-export commonly used types
pub use crate::core::{error::DomainError, query::Query};
pub use session::{
    answer::Answer,
    entities::{ProfileId, SessionId},
    model::ModelSpec,
    packet::Packet,
};
pub use triage::{marker::TriggerMarker, stage::Stage};
