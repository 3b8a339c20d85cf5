//! Presentation layer for casematch
//!
//! This crate contains the CLI definition, console formatting and the
//! streaming progress reporter.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::StreamingReporter;
