//! Running a whole batch: render and write one certificate per name.
//!
//! A failure for one name is recorded and the batch moves on (unless
//! [`ErrorMode::Strict`] is selected). Every name ends up in the
//! [`BatchReport`] exactly once, in input order.

use crate::error::Error;
use crate::model::NameRecord;
use crate::output::{FileNamer, OutputWriter};
use crate::render::CertificateRenderer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// How per-name failures affect the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Report the failure and continue with the next name
    #[default]
    Lenient,
    /// Stop starting new certificates after the first failure
    Strict,
}

/// Options for running a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Failure handling
    pub error_mode: ErrorMode,

    /// Render and write certificates on the rayon thread pool
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at the first failure.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// What happened to a single name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The certificate was written
    Written,
    /// Rendering or writing failed
    Failed { error: String },
    /// Not attempted because a strict batch had already failed
    Skipped,
}

/// Result for one name of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// 1-based position in the batch
    pub ordinal: usize,

    /// The name this certificate was for
    pub name: NameRecord,

    /// Target file path
    pub path: PathBuf,

    /// Result
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl Outcome {
    /// Whether the certificate was written.
    pub fn is_written(&self) -> bool {
        self.status == OutcomeStatus::Written
    }

    /// Error message if the certificate failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Certificates written
    pub written: usize,

    /// Certificates that failed
    pub failed: usize,

    /// Names not attempted
    pub skipped: usize,

    /// Per-name outcomes, in input order
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<Outcome>) -> Self {
        let mut report = Self::default();
        for outcome in &outcomes {
            match outcome.status {
                OutcomeStatus::Written => report.written += 1,
                OutcomeStatus::Failed { .. } => report.failed += 1,
                OutcomeStatus::Skipped => report.skipped += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    /// Number of names in the batch.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// True if every certificate was written.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.error().is_some())
    }

    /// Paths of written certificates, in input order.
    pub fn written_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| o.is_written())
            .map(|o| &o.path)
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Hooks for following a batch as it runs.
///
/// All methods do nothing by default. In parallel mode the per-name hooks are
/// called from worker threads in completion order.
pub trait BatchObserver: Sync {
    /// Called once before the first certificate.
    fn on_start(&self, total: usize) {
        let _ = total;
    }

    /// Called after a certificate was written.
    fn on_written(&self, outcome: &Outcome) {
        let _ = outcome;
    }

    /// Called after a certificate failed.
    fn on_failed(&self, outcome: &Outcome, error: &Error) {
        let _ = (outcome, error);
    }

    /// Called once with the final report.
    fn on_finish(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {}

struct Job<'a> {
    ordinal: usize,
    name: &'a NameRecord,
    stem: String,
}

/// Render and write a certificate for every name.
///
/// File names are allocated up front from `namer`, so duplicates are resolved
/// the same way whether or not the batch runs in parallel.
pub fn run_batch(
    names: &[NameRecord],
    renderer: &CertificateRenderer,
    writer: &OutputWriter,
    mut namer: FileNamer,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> BatchReport {
    let jobs: Vec<Job<'_>> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let ordinal = idx + 1;
            let stem = namer.next_stem(ordinal, name);
            Job {
                ordinal,
                name,
                stem,
            }
        })
        .collect();

    log::info!(
        "Generating {} certificates into {}",
        jobs.len(),
        writer.dir().display()
    );
    observer.on_start(jobs.len());

    let stop = AtomicBool::new(false);
    let run = |job: &Job<'_>| process(job, renderer, writer, options, &stop, observer);

    let outcomes: Vec<Outcome> = if options.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    let report = BatchReport::from_outcomes(outcomes);
    log::info!(
        "Batch finished: {} written, {} failed, {} skipped",
        report.written,
        report.failed,
        report.skipped
    );
    observer.on_finish(&report);
    report
}

fn process(
    job: &Job<'_>,
    renderer: &CertificateRenderer,
    writer: &OutputWriter,
    options: &BatchOptions,
    stop: &AtomicBool,
    observer: &dyn BatchObserver,
) -> Outcome {
    let mut outcome = Outcome {
        ordinal: job.ordinal,
        name: job.name.clone(),
        path: writer.path_for(&job.stem),
        status: OutcomeStatus::Skipped,
    };

    if stop.load(Ordering::Relaxed) {
        return outcome;
    }

    match renderer
        .render(job.name)
        .and_then(|cert| writer.write(&cert, &job.stem))
    {
        Ok(path) => {
            outcome.path = path;
            outcome.status = OutcomeStatus::Written;
            observer.on_written(&outcome);
        }
        Err(e) => {
            log::warn!("Certificate {} (\"{}\") failed: {}", job.ordinal, job.name, e);
            outcome.status = OutcomeStatus::Failed {
                error: e.to_string(),
            };
            if options.error_mode == ErrorMode::Strict {
                stop.store(true, Ordering::Relaxed);
            }
            observer.on_failed(&outcome, &e);
        }
    }
    outcome
}
