//! Output image formats and magic-byte detection.

use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const BMP_MAGIC: &[u8] = b"BM";

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Raster format used for written certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG; transparency is flattened onto white
    Jpeg,
    /// Uncompressed BMP
    Bmp,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }

    /// MIME type of the encoded output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Bmp => "image/bmp",
        }
    }

    /// Look up a format by file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    /// Guess a format from a file path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Identify an encoded image by its leading bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(PNG_MAGIC) {
            Some(OutputFormat::Png)
        } else if data.starts_with(JPEG_MAGIC) {
            Some(OutputFormat::Jpeg)
        } else if data.starts_with(BMP_MAGIC) {
            Some(OutputFormat::Bmp)
        } else {
            None
        }
    }

    /// Encode an image in this format.
    ///
    /// `jpeg_quality` is ignored by the lossless formats.
    pub fn encode(&self, image: &RgbaImage, jpeg_quality: u8) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        match self {
            OutputFormat::Png => image.write_to(&mut buf, ImageFormat::Png)?,
            OutputFormat::Bmp => image.write_to(&mut buf, ImageFormat::Bmp)?,
            OutputFormat::Jpeg => {
                let quality = jpeg_quality.clamp(1, 100);
                let flattened = flatten_on_white(image);
                JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&flattened)?;
            }
        }
        Ok(buf.into_inner())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim().trim_start_matches('.'))
            .ok_or_else(|| Error::InvalidConfig(format!("unsupported output format: {}", s)))
    }
}

fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let over = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_from_extension() {
        assert_eq!(OutputFormat::from_extension("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_extension("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("gif"), None);
        assert_eq!(OutputFormat::from_path("out/cert.BMP"), Some(OutputFormat::Bmp));
    }

    #[test]
    fn test_parse() {
        assert_eq!(".png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!(matches!("tiff".parse::<OutputFormat>(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_encode_and_detect() {
        let image = RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]));
        for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Bmp] {
            let bytes = format.encode(&image, DEFAULT_JPEG_QUALITY).unwrap();
            assert_eq!(OutputFormat::detect(&bytes), Some(format), "{format}");
        }
        assert_eq!(OutputFormat::detect(b"GIF89a"), None);
    }

    #[test]
    fn test_flatten_transparent_is_white() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let flat = flatten_on_white(&image);
        assert_eq!(flat.get_pixel(1, 1).0, [255, 255, 255]);
    }
}
