//! Glyph rasterization onto an RGBA canvas.

use super::font::FontFace;
use super::options::{Color, HorizontalAlign};
use image::RgbaImage;

/// Where a line of text ended up, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    pub clipped: bool,
}

/// Compute the pen origin for `text` anchored at `(x, y)`.
///
/// `y` is the top of the line box; the returned baseline sits `ascent` below it.
pub(crate) fn place(
    font: &FontFace,
    text: &str,
    size: f32,
    x: i32,
    y: i32,
    align: HorizontalAlign,
    canvas_width: u32,
) -> Placement {
    let metrics = font.measure(text, size);
    let ink_start = match align {
        HorizontalAlign::Left => x as f32,
        HorizontalAlign::Center => x as f32 - metrics.width / 2.0,
        HorizontalAlign::Right => x as f32 - metrics.width,
    };
    let ink_start = ink_start.round();

    Placement {
        x: ink_start - metrics.left_bearing,
        baseline: y as f32 + metrics.ascent,
        width: metrics.width,
        clipped: ink_start < 0.0 || ink_start + metrics.width > canvas_width as f32,
    }
}

/// Draw `text` with its pen origin at `placement`, blending `color` over the canvas.
///
/// Pixels falling outside the canvas are dropped.
pub(crate) fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontFace,
    text: &str,
    size: f32,
    placement: Placement,
    color: Color,
) {
    let (width, height) = canvas.dimensions();
    let [r, g, b, a] = color.0 .0;
    let color_alpha = a as f32 / 255.0;

    for glyph in font.layout(text, size, placement.x, placement.baseline) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }

            let alpha = coverage * color_alpha;
            if alpha <= 0.0 {
                return;
            }

            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            let inv = 1.0 - alpha;
            dst.0[0] = blend(r, dst.0[0], alpha, inv);
            dst.0[1] = blend(g, dst.0[1], alpha, inv);
            dst.0[2] = blend(b, dst.0[2], alpha, inv);
            dst.0[3] = (alpha * 255.0 + dst.0[3] as f32 * inv).round().min(255.0) as u8;
        });
    }
}

fn blend(src: u8, dst: u8, alpha: f32, inv: f32) -> u8 {
    (src as f32 * alpha + dst as f32 * inv).round().clamp(0.0, 255.0) as u8
}
