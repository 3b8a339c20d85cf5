//! Chat session domain.
//!
//! - [`entities::SessionId`] / [`entities::ProfileId`]: session identity and persona
//! - [`model::ModelSpec`]: model override for a session
//! - [`packet::Packet`]: one decoded unit of a streamed exchange
//! - [`answer::Answer`]: packets folded into the assembled answer

pub mod answer;
pub mod entities;
pub mod model;
pub mod packet;
