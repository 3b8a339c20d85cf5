//! Console formatting for two-stage runs

use casematch_domain::{Answer, Stage};
use colored::Colorize;

/// Formats stage headers and run summaries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Header printed before a stage's answer starts streaming
    pub fn stage_header(stage: Stage) -> String {
        let title = match stage {
            Stage::Triage => "Stage 1: Triage",
            Stage::Detailed => "Stage 2: Detailed answer",
        };
        format!("{}\n{}", title.cyan().bold(), "-".repeat(40))
    }

    /// One-line summary printed after a stage's stream has been drained
    pub fn stage_footer(answer: &Answer) -> String {
        let mut summary = format!("{} fragments", answer.fragment_count());
        let sources = answer.sources().len();
        if sources > 0 {
            summary.push_str(&format!(", {} sources", sources));
        }
        if !answer.is_complete() {
            summary.push_str(", incomplete");
        }
        format!("{}", format!("({})", summary).dimmed())
    }

    pub fn trigger_line(triggered: bool) -> String {
        if triggered {
            format!("{} {}", "->".cyan(), "Escalating to detailed stage".bold())
        } else {
            format!("{} {}", "v".green(), "Triage answer is final".dimmed())
        }
    }

    pub fn aborted() -> String {
        format!("{}", "Aborted.".yellow())
    }
}
