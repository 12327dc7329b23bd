//! Writing encoded certificates to disk.

use super::format::{OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::error::{Error, Result};
use crate::model::RenderedCertificate;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Writes certificates into an output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    format: OutputFormat,
    jpeg_quality: u8,
}

impl OutputWriter {
    /// Create a writer targeting `dir`, writing PNG files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: OutputFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality (1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Create the output directory if it does not exist.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Write {
            path: self.dir.clone(),
            source,
        })
    }

    /// Full path a certificate with this stem would be written to.
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.format.extension()))
    }

    /// Encode and write one certificate, returning the written path.
    ///
    /// The stem must name a single file inside the output directory; stems
    /// with path separators or `.`/`..` components fail with [`Error::Write`].
    pub fn write(&self, certificate: &RenderedCertificate, stem: &str) -> Result<PathBuf> {
        let path = self.path_for(stem);
        if !is_plain_stem(stem) {
            return Err(Error::Write {
                path,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file name must not contain path separators",
                ),
            });
        }
        self.write_to(certificate, path)
    }

    /// Encode and write one certificate to an exact path.
    ///
    /// The image is encoded completely before the file is opened, so an
    /// encoding failure never leaves a truncated file behind.
    pub fn write_to(
        &self,
        certificate: &RenderedCertificate,
        path: impl Into<PathBuf>,
    ) -> Result<PathBuf> {
        let path = path.into();
        let bytes = self.format.encode(&certificate.image, self.jpeg_quality)?;

        fs::write(&path, &bytes).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        log::debug!(
            "Wrote {} ({} bytes) for \"{}\"",
            path.display(),
            bytes.len(),
            certificate.name
        );
        Ok(path)
    }
}

/// A stem that is one ordinary path component on every platform.
fn is_plain_stem(stem: &str) -> bool {
    if stem.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(stem).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
