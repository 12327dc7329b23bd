//! Job configuration loaded from JSON.
//!
//! A job file captures everything needed to regenerate a batch:
//!
//! ```json
//! {
//!   "names": "names.txt",
//!   "template": "base_cert.jpg",
//!   "output_dir": "certificates",
//!   "font": "fonts/DejaVuSans.ttf",
//!   "render": { "x": 900, "y": 510, "font_size": 64, "color": "#1a1a1a" },
//!   "format": "png",
//!   "case": "title"
//! }
//! ```
//!
//! Relative paths are resolved against the directory containing the file.

use crate::batch::ErrorMode;
use crate::error::{Error, Result};
use crate::names::NameCase;
use crate::output::{DuplicatePolicy, NamingMode, OutputFormat};
use crate::render::RenderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "certificates";

/// Settings for one certificate batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Names file, one name per line
    pub names: Option<PathBuf>,

    /// Template image
    pub template: Option<PathBuf>,

    /// Directory certificates are written to
    pub output_dir: PathBuf,

    /// Font file (a system font is used if unset)
    pub font: Option<PathBuf>,

    /// Text placement and styling
    pub render: RenderConfig,

    /// Output image format
    pub format: OutputFormat,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// How file names are derived
    pub naming: NamingMode,

    /// What to do with duplicate names
    pub duplicates: DuplicatePolicy,

    /// Prefix for every output file name
    pub prefix: String,

    /// Case transformation applied to names
    pub case: NameCase,

    /// Render on all cores
    pub parallel: bool,

    /// Failure handling
    pub error_mode: ErrorMode,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            names: None,
            template: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            font: None,
            render: RenderConfig::default(),
            format: OutputFormat::default(),
            jpeg_quality: crate::output::DEFAULT_JPEG_QUALITY,
            naming: NamingMode::default(),
            duplicates: DuplicatePolicy::default(),
            prefix: String::new(),
            case: NameCase::default(),
            parallel: false,
            error_mode: ErrorMode::default(),
        }
    }
}

impl JobConfig {
    /// Load a job file, resolving relative paths against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        let config = Self::from_json(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Parse a job from JSON text. Paths are kept as written.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.names = self.names.map(join);
        self.template = self.template.map(join);
        self.font = self.font.map(join);
        self.output_dir = join(self.output_dir);
        self
    }

    /// The names file, or an error if none was configured.
    pub fn names_path(&self) -> Result<&Path> {
        self.names
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("no names file given".to_string()))
    }

    /// The template path, or an error if none was configured.
    pub fn template_path(&self) -> Result<&Path> {
        self.template
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("no template image given".to_string()))
    }
}
