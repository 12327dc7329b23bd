//! Terminal progress reporting for batch runs.

use certbatch::{BatchObserver, BatchReport, Error, Outcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Drives an indicatif progress bar from batch events.
pub struct ProgressObserver {
    pb: ProgressBar,
}

impl ProgressObserver {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self { pb }
    }
}

impl BatchObserver for ProgressObserver {
    fn on_start(&self, total: usize) {
        self.pb.set_length(total as u64);
        self.pb.set_message("Rendering...");
    }

    fn on_written(&self, outcome: &Outcome) {
        self.pb.set_message(outcome.name.to_string());
        self.pb.inc(1);
    }

    fn on_failed(&self, outcome: &Outcome, error: &Error) {
        self.pb.println(format!(
            "  {} {} ({}): {}",
            "✗".red(),
            outcome.name,
            outcome.ordinal,
            error
        ));
        self.pb.inc(1);
    }

    fn on_finish(&self, _report: &BatchReport) {
        self.pb.finish_and_clear();
    }
}
