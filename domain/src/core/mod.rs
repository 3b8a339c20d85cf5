//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: the validated free text sent to both stages
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod query;
