//! Rendering names onto certificate templates.

mod draw;
mod font;
mod options;
mod renderer;

pub use font::{FontFace, TextMetrics};
pub use options::{Color, HorizontalAlign, RenderConfig, TextField, DEFAULT_FONT_SIZE};
pub use renderer::CertificateRenderer;
