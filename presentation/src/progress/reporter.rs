//! Streaming progress reporting for two-stage runs

use crate::output::console::ConsoleFormatter;
use casematch_application::StageProgressNotifier;
use casematch_domain::{Answer, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Streams answer fragments to stdout, with a spinner while a stage waits
/// for its first fragment
pub struct StreamingReporter {
    spinner: Mutex<Option<ProgressBar>>,
    show_progress: bool,
}

impl StreamingReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            show_progress,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl StageProgressNotifier for StreamingReporter {
    fn on_stage_start(&self, stage: Stage) {
        if !self.show_progress {
            return;
        }
        println!("{}", ConsoleFormatter::stage_header(stage));

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("Waiting for {} answer...", stage));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_answer_piece(&self, _stage: Stage, piece: &str) {
        self.clear_spinner();
        if let Err(e) = write_piece(&mut std::io::stdout().lock(), piece) {
            debug!("Could not write answer fragment to stdout: {}", e);
        }
    }

    fn on_stage_complete(&self, _stage: Stage, answer: &Answer) {
        self.clear_spinner();
        println!();
        if self.show_progress {
            println!("{}\n", ConsoleFormatter::stage_footer(answer));
        }
    }

    fn on_trigger_checked(&self, triggered: bool) {
        if self.show_progress {
            println!("{}\n", ConsoleFormatter::trigger_line(triggered));
        }
    }
}

fn write_piece(out: &mut impl Write, piece: &str) -> std::io::Result<()> {
    out.write_all(piece.as_bytes())?;
    out.flush()
}

impl Drop for StreamingReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
