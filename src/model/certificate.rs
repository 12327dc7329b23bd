//! A certificate with one name drawn on it.

use super::NameRecord;
use image::RgbaImage;

/// Output of a single render, waiting to be written.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    /// The name drawn on this certificate
    pub name: NameRecord,

    /// Rendered pixels, same dimensions as the template
    pub image: RgbaImage,
}

impl RenderedCertificate {
    /// Create a rendered certificate.
    pub fn new(name: NameRecord, image: RgbaImage) -> Self {
        Self { name, image }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
