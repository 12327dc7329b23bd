//! Certificate renderer.

use super::draw::{draw_text, place};
use super::font::FontFace;
use super::options::RenderConfig;
use crate::error::{Error, Result};
use crate::model::{NameRecord, RenderedCertificate, Template};

/// Draws names onto copies of a template.
///
/// The renderer only ever reads its template, font and configuration, so a
/// single instance can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use certbatch::model::{NameRecord, Template};
/// use certbatch::render::{CertificateRenderer, FontFace, RenderConfig};
///
/// let template = Template::open("certificate.png")?;
/// let font = FontFace::from_file("DejaVuSans.ttf")?;
/// let config = RenderConfig::new().with_anchor(500, 400).with_font_size(48.0);
///
/// let renderer = CertificateRenderer::new(template, font, config)?;
/// let cert = renderer.render(&NameRecord::new("Ada Lovelace").unwrap())?;
/// assert_eq!(cert.width(), renderer.template().width());
/// # Ok::<(), certbatch::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CertificateRenderer {
    template: Template,
    font: FontFace,
    config: RenderConfig,
    anchor: (i32, i32),
}

impl CertificateRenderer {
    /// Create a renderer, validating the configuration against the template.
    pub fn new(template: Template, font: FontFace, config: RenderConfig) -> Result<Self> {
        let (width, height) = template.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::Render("template has no pixels".to_string()));
        }
        config.validate(width, height)?;
        let anchor = config.anchor(width, height);

        Ok(Self {
            template,
            font,
            config,
            anchor,
        })
    }

    /// The template every certificate is drawn on.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Where the name is anchored on this template.
    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    /// Render one certificate.
    pub fn render(&self, name: &NameRecord) -> Result<RenderedCertificate> {
        let mut canvas = self.template.canvas();
        let width = canvas.width();
        let config = &self.config;

        let placement = place(
            &self.font,
            name.as_str(),
            config.font_size,
            self.anchor.0,
            self.anchor.1,
            config.align,
            width,
        );
        if placement.clipped {
            log::warn!(
                "Name \"{}\" is {:.0}px wide and does not fit on the {}px template",
                name,
                placement.width,
                width
            );
        }
        draw_text(
            &mut canvas,
            &self.font,
            name.as_str(),
            config.font_size,
            placement,
            config.color,
        );

        for field in &config.fields {
            let placement = place(
                &self.font,
                &field.text,
                field.size,
                field.x,
                field.y,
                field.align.unwrap_or(config.align),
                width,
            );
            draw_text(
                &mut canvas,
                &self.font,
                &field.text,
                field.size,
                placement,
                field.color.unwrap_or(config.color),
            );
        }

        log::debug!("Rendered certificate for \"{}\"", name);
        Ok(RenderedCertificate::new(name.clone(), canvas))
    }
}
