//! The pristine certificate background.

use crate::error::{Error, Result};
use image::{DynamicImage, ImageReader, RgbaImage};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

/// Decoded certificate template.
///
/// The pixel buffer is private and only ever handed out as a copy, so every
/// certificate starts from the same untouched image.
#[derive(Debug, Clone)]
pub struct Template {
    image: RgbaImage,
    source: Option<PathBuf>,
}

impl Template {
    /// Load a template from an image file.
    ///
    /// The format is guessed from the file contents, not the extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = match ImageReader::open(path) {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingInput(path.to_path_buf()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let image = reader
            .with_guessed_format()
            .map_err(Error::Io)?
            .decode()
            .map_err(|e| Error::ImageLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::debug!(
            "Loaded template {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self {
            image: image.to_rgba8(),
            source: Some(path.to_path_buf()),
        })
    }

    /// Decode a template from encoded image bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(Error::Io)?
            .decode()
            .map_err(|e| Error::ImageLoad {
                path: PathBuf::from("<memory>"),
                reason: e.to_string(),
            })?;
        Ok(Self::from_image(image))
    }

    /// Wrap an already-decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgba8(),
            source: None,
        }
    }

    /// Wrap an RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            source: None,
        }
    }

    /// Template width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Template height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Template dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// File the template was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Read-only view of the template pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    /// A fresh copy of the template to draw on.
    pub fn canvas(&self) -> RgbaImage {
        self.image.clone()
    }
}
