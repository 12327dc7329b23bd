//! Font loading and text measurement.

use crate::error::{Error, Result};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fonts probed by [`FontFace::system_default`], in order.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded TrueType/OpenType font.
#[derive(Clone)]
pub struct FontFace {
    font: Font<'static>,
    path: Option<PathBuf>,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("path", &self.path)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

/// Measured extent of a line of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Width of the inked area
    pub width: f32,

    /// Line height (ascent minus descent)
    pub height: f32,

    /// Distance from the top of the line box to the baseline
    pub ascent: f32,

    /// Horizontal offset of the first inked pixel from the pen origin
    pub left_bearing: f32,
}

impl FontFace {
    /// Load a font file.
    ///
    /// A missing or unparsable file is reported as [`Error::FontLoad`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: match e.kind() {
                io::ErrorKind::NotFound => "file not found".to_string(),
                _ => e.to_string(),
            },
        })?;

        let mut face = Self::parse(data, path)?;
        face.path = Some(path.to_path_buf());
        log::debug!("Loaded font {}", path.display());
        Ok(face)
    }

    /// Load a font from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::parse(data, Path::new("<memory>"))
    }

    fn parse(data: Vec<u8>, origin: &Path) -> Result<Self> {
        let font = Font::try_from_vec(data).ok_or_else(|| Error::FontLoad {
            path: origin.to_path_buf(),
            reason: "not a valid TrueType/OpenType font".to_string(),
        })?;
        Ok(Self { font, path: None })
    }

    /// Load the first font found in well-known system locations.
    pub fn system_default() -> Result<Self> {
        let found = SYSTEM_FONTS.iter().map(Path::new).find(|p| p.is_file());
        match found {
            Some(path) => Self::from_file(path),
            None => Err(Error::FontLoad {
                path: PathBuf::from(SYSTEM_FONTS[0]),
                reason: "no system font found; pass a font file explicitly".to_string(),
            }),
        }
    }

    /// Path the font was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lay out `text` with the pen starting at `(x, baseline)`.
    pub(crate) fn layout(
        &self,
        text: &str,
        size: f32,
        x: f32,
        baseline: f32,
    ) -> Vec<PositionedGlyph<'static>> {
        self.font
            .layout(text, Scale::uniform(size), point(x, baseline))
            .collect()
    }

    /// Measure a single line of text.
    pub fn measure(&self, text: &str, size: f32) -> TextMetrics {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        let glyphs = self.layout(text, size, 0.0, v_metrics.ascent);

        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        for bb in glyphs.iter().filter_map(|g| g.pixel_bounding_box()) {
            min_x = min_x.min(bb.min.x);
            max_x = max_x.max(bb.max.x);
        }

        let (width, left_bearing) = if min_x <= max_x {
            ((max_x - min_x) as f32, min_x as f32)
        } else {
            // Nothing inked (e.g. only zero-width characters)
            let advance = glyphs
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0);
            (advance, 0.0)
        };

        TextMetrics {
            width,
            height: v_metrics.ascent - v_metrics.descent,
            ascent: v_metrics.ascent,
            left_bearing,
        }
    }
}

/// DejaVu Sans, bundled so rendering tests never depend on installed fonts.
#[cfg(test)]
pub(crate) fn test_font() -> FontFace {
    FontFace::from_bytes(include_bytes!("../../tests/fixtures/DejaVuSans.ttf").to_vec()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file() {
        let err = FontFace::from_file("no/such/font.ttf").unwrap_err();
        match err {
            Error::FontLoad { reason, .. } => assert_eq!(reason, "file not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_font_bytes() {
        let err = FontFace::from_bytes(b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, Error::FontLoad { .. }));
    }

    #[test]
    fn test_fixture_font_loads_from_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf");
        let face = FontFace::from_file(&path).unwrap();
        assert_eq!(face.path(), Some(path.as_path()));
    }

    #[test]
    fn test_measure_grows_with_text() {
        let face = test_font();

        let short = face.measure("A", 48.0);
        let long = face.measure("A Much Longer Name", 48.0);
        assert!(short.width > 0.0);
        assert!(long.width > short.width * 5.0);
        assert_eq!(short.height, long.height);
        assert!(short.ascent > 0.0 && short.ascent <= short.height);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let face = test_font();

        let small = face.measure("Certificate", 24.0);
        let large = face.measure("Certificate", 48.0);
        assert!(large.width > small.width * 1.8);
        assert!(large.height > small.height * 1.8);
    }
}
