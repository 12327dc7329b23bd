//! # certbatch
//!
//! Batch generation of personalized certificate images.
//!
//! A list of names is read from a text file, each name is drawn onto a copy
//! of a certificate template, and every result is written as its own image.
//!
//! ## Quick Start
//!
//! ```no_run
//! use certbatch::{Certbatch, RenderConfig};
//!
//! fn main() -> certbatch::Result<()> {
//!     let report = Certbatch::new()
//!         .with_names("names.txt")
//!         .with_template("certificate.png")
//!         .with_font("DejaVuSans.ttf")
//!         .with_render_config(RenderConfig::new().with_anchor(500, 400).with_font_size(48.0))
//!         .with_output_dir("out")
//!         .load()?
//!         .run();
//!
//!     println!("{} written, {} failed", report.written, report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`names`]: reads and cleans the name list
//! - [`render`]: draws a name onto a fresh copy of the template
//! - [`output`]: derives file names and writes encoded images
//! - [`batch`]: drives the three stages and collects a [`BatchReport`]

pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod output;
pub mod render;

// Re-export commonly used types
pub use batch::{
    run_batch, BatchObserver, BatchOptions, BatchReport, ErrorMode, Outcome, OutcomeStatus,
    SilentObserver,
};
pub use config::JobConfig;
pub use error::{Error, Result};
pub use model::{NameRecord, RenderedCertificate, Template};
pub use names::{parse_names, read_names, NameCase, ReadOptions};
pub use output::{DuplicatePolicy, FileNamer, NamingMode, OutputFormat, OutputWriter};
pub use render::{CertificateRenderer, Color, FontFace, HorizontalAlign, RenderConfig, TextField};

use std::path::{Path, PathBuf};

/// Run a whole job described by a [`JobConfig`].
///
/// # Example
///
/// ```no_run
/// use certbatch::{generate, JobConfig};
///
/// let config = JobConfig::from_file("job.json")?;
/// let report = generate(&config)?;
/// assert!(report.is_success());
/// # Ok::<(), certbatch::Error>(())
/// ```
pub fn generate(config: &JobConfig) -> Result<BatchReport> {
    Ok(Certbatch::from_config(config.clone()).load()?.run())
}

/// Builder for a certificate batch.
///
/// Loading is all-or-nothing: a missing names file, template or font, an
/// invalid configuration or an unusable output directory fails
/// [`Certbatch::load`] before any certificate is written.
#[derive(Debug, Clone, Default)]
pub struct Certbatch {
    config: JobConfig,
}

impl Certbatch {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing job configuration.
    pub fn from_config(config: JobConfig) -> Self {
        Self { config }
    }

    /// Set the names file.
    pub fn with_names(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.names = Some(path.into());
        self
    }

    /// Set the template image.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template = Some(path.into());
        self
    }

    /// Set the font file.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font = Some(path.into());
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set text placement and styling.
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.config.render = render;
        self
    }

    /// Set the output image format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set how file names are derived.
    pub fn with_naming(mut self, naming: NamingMode) -> Self {
        self.config.naming = naming;
        self
    }

    /// Set the duplicate policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicates = policy;
        self
    }

    /// Set the case transformation applied to names.
    pub fn with_case(mut self, case: NameCase) -> Self {
        self.config.case = case;
        self
    }

    /// Enable or disable parallel rendering.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Stop at the first failed certificate.
    pub fn strict(mut self) -> Self {
        self.config.error_mode = ErrorMode::Strict;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Load every input and prepare the output directory.
    pub fn load(self) -> Result<LoadedBatch> {
        let config = self.config;

        let read_options = ReadOptions::new().with_case(config.case);
        let names = read_names(config.names_path()?, &read_options)?;

        let template = Template::open(config.template_path()?)?;
        let font = match &config.font {
            Some(path) => FontFace::from_file(path)?,
            None => FontFace::system_default()?,
        };
        let renderer = CertificateRenderer::new(template, font, config.render.clone())?;

        let writer = OutputWriter::new(&config.output_dir)
            .with_format(config.format)
            .with_jpeg_quality(config.jpeg_quality);
        writer.ensure_dir()?;

        let namer = FileNamer::new()
            .with_mode(config.naming)
            .with_duplicates(config.duplicates)
            .with_prefix(config.prefix.clone());

        let options = BatchOptions::new()
            .with_error_mode(config.error_mode)
            .with_parallel(config.parallel);

        Ok(LoadedBatch {
            names,
            renderer,
            writer,
            namer,
            options,
        })
    }
}

/// A batch whose inputs have all been loaded successfully.
#[derive(Debug)]
pub struct LoadedBatch {
    names: Vec<NameRecord>,
    renderer: CertificateRenderer,
    writer: OutputWriter,
    namer: FileNamer,
    options: BatchOptions,
}

impl LoadedBatch {
    /// Names that will be rendered, in order.
    pub fn names(&self) -> &[NameRecord] {
        &self.names
    }

    /// The renderer in use.
    pub fn renderer(&self) -> &CertificateRenderer {
        &self.renderer
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Run the batch without progress reporting.
    pub fn run(self) -> BatchReport {
        self.run_with_observer(&SilentObserver)
    }

    /// Run the batch, reporting progress to `observer`.
    pub fn run_with_observer(self, observer: &dyn BatchObserver) -> BatchReport {
        run_batch(
            &self.names,
            &self.renderer,
            &self.writer,
            self.namer,
            &self.options,
            observer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = Certbatch::new()
            .with_names("names.txt")
            .with_template("base.png")
            .with_output_dir("out")
            .with_format(OutputFormat::Jpeg)
            .with_naming(NamingMode::Indexed)
            .with_duplicates(DuplicatePolicy::Overwrite)
            .with_case(NameCase::Upper)
            .parallel(true)
            .strict();

        let config = builder.config();
        assert_eq!(config.names.as_deref(), Some(Path::new("names.txt")));
        assert_eq!(config.template.as_deref(), Some(Path::new("base.png")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.format, OutputFormat::Jpeg);
        assert_eq!(config.naming, NamingMode::Indexed);
        assert_eq!(config.duplicates, DuplicatePolicy::Overwrite);
        assert_eq!(config.case, NameCase::Upper);
        assert!(config.parallel);
        assert_eq!(config.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_load_without_names_is_config_error() {
        let err = Certbatch::new().with_template("base.png").load().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_load_missing_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = Certbatch::new()
            .with_names(dir.path().join("missing.txt"))
            .with_template(dir.path().join("base.png"))
            .with_output_dir(&out)
            .load()
            .unwrap_err();

        assert!(matches!(err, Error::MissingInput(_)));
        assert!(!out.exists());
    }
}
