//! Rendering options and configuration.

use crate::error::{Error, Result};
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 48.0;

/// Options describing where and how the name is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Font size in pixels
    pub font_size: f32,

    /// Horizontal anchor coordinate (template center if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,

    /// Vertical anchor coordinate, top of the text line (template middle if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,

    /// How the text is placed relative to `x`
    pub align: HorizontalAlign,

    /// Text color
    pub color: Color,

    /// Static labels drawn on every certificate
    pub fields: Vec<TextField>,
}

impl RenderConfig {
    /// Create new render config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the anchor position.
    pub fn with_anchor(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Anchor on a template of the given size, filling unset coordinates
    /// with the template center.
    pub fn anchor(&self, width: u32, height: u32) -> (i32, i32) {
        (
            self.x.unwrap_or((width / 2) as i32),
            self.y.unwrap_or((height / 2) as i32),
        )
    }

    /// Set the horizontal alignment.
    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    /// Center the text horizontally around the anchor.
    pub fn centered(mut self) -> Self {
        self.align = HorizontalAlign::Center;
        self
    }

    /// Set the text color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Add a static text field.
    pub fn with_field(mut self, field: TextField) -> Self {
        self.fields.push(field);
        self
    }

    /// Check the configuration against the template dimensions.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        check_size(self.font_size)?;
        let (x, y) = self.anchor(width, height);
        check_anchor(x, y, width, height)?;
        for field in &self.fields {
            check_size(field.size)?;
            check_anchor(field.x, field.y, width, height)
                .map_err(|e| Error::Render(format!("field \"{}\": {}", field.text, e)))?;
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            x: None,
            y: None,
            align: HorizontalAlign::Center,
            color: Color::BLACK,
            fields: Vec::new(),
        }
    }
}

fn check_size(size: f32) -> Result<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(Error::Render(format!("invalid font size {}", size)));
    }
    Ok(())
}

fn check_anchor(x: i32, y: i32, width: u32, height: u32) -> Result<()> {
    let inside = x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height;
    if !inside {
        return Err(Error::Render(format!(
            "anchor ({}, {}) is outside the {}x{} template",
            x, y, width, height
        )));
    }
    Ok(())
}

/// Horizontal placement of text relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Text starts at the anchor
    Left,
    /// Text is centered on the anchor
    #[default]
    Center,
    /// Text ends at the anchor
    Right,
}

impl FromStr for HorizontalAlign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(HorizontalAlign::Left),
            "center" | "centre" => Ok(HorizontalAlign::Center),
            "right" => Ok(HorizontalAlign::Right),
            other => Err(Error::InvalidConfig(format!("unknown alignment: {}", other))),
        }
    }
}

/// A static label such as the event name or award rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    /// Text to draw
    pub text: String,

    /// Horizontal anchor coordinate
    pub x: i32,

    /// Vertical anchor coordinate
    pub y: i32,

    /// Font size in pixels
    pub size: f32,

    /// Text color (falls back to the name color)
    #[serde(default)]
    pub color: Option<Color>,

    /// Alignment (falls back to the name alignment)
    #[serde(default)]
    pub align: Option<HorizontalAlign>,
}

impl TextField {
    /// Create a field at the given position.
    pub fn new(text: impl Into<String>, x: i32, y: i32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color: None,
            align: None,
        }
    }

    /// Set the field color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the field alignment.
    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = Some(align);
        self
    }
}

impl FromStr for TextField {
    type Err = Error;

    /// Parse `TEXT:X:Y:SIZE`. The text itself may contain colons.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfig(format!("expected TEXT:X:Y:SIZE, got \"{}\"", s));

        let mut parts = s.rsplitn(4, ':');
        let size = parts.next().ok_or_else(invalid)?;
        let y = parts.next().ok_or_else(invalid)?;
        let x = parts.next().ok_or_else(invalid)?;
        let text = parts.next().ok_or_else(invalid)?;

        if text.trim().is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(
            text,
            x.trim().parse().map_err(|_| invalid())?,
            y.trim().parse().map_err(|_| invalid())?,
            size.trim().parse().map_err(|_| invalid())?,
        ))
    }
}

/// An RGBA text color, written as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub Rgba<u8>);

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color(Rgba([0, 0, 0, 255]));

    /// Opaque white.
    pub const WHITE: Color = Color(Rgba([255, 255, 255, 255]));

    /// Create an opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(Rgba([r, g, b, 255]))
    }

    /// Alpha channel.
    pub fn alpha(&self) -> u8 {
        self.0 .0[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::InvalidConfig(format!("invalid color: {}", s));

        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha])))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0 .0;
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
