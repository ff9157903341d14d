// watermarker/src/processors/text.rs
use crate::core::{Result, WatermarkError};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{imageops, Rgb, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::path::{Path, PathBuf};

/// Counter-clockwise rotation applied to every watermark tile, in degrees.
pub const TILE_ROTATION_DEGREES: f32 = 45.0;

/// DejaVu Sans, shipped inside the binary so the default font works from any
/// working directory.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BUNDLED_FONT_NAME: &str = "<bundled DejaVuSans.ttf>";

#[cfg(test)]
thread_local! {
    pub(crate) static RASTERIZE_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Loads the font at `path`, or the bundled font when no path is given.
pub fn load_font(path: Option<&Path>) -> Result<FontVec> {
    let (data, name) = match path {
        Some(path) => {
            let data = std::fs::read(path).map_err(|e| WatermarkError::FontLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            (data, path.to_path_buf())
        }
        None => (BUNDLED_FONT.to_vec(), PathBuf::from(BUNDLED_FONT_NAME)),
    };

    FontVec::try_from_vec(data).map_err(|e| WatermarkError::FontLoad {
        path: name,
        reason: e.to_string(),
    })
}

/// Advance width of `text` plus the font's ascent + descent, in whole pixels.
pub fn measure_text(font: &FontVec, font_size: u32, text: &str) -> (u32, u32) {
    let scaled = font.as_scaled(PxScale::from(font_size as f32));

    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    let height = scaled.ascent().ceil() + (-scaled.descent()).ceil();
    (width.max(0.0) as u32, height.max(0.0) as u32)
}

/// Rasterizes `text` onto a transparent canvas sized by [`measure_text`].
///
/// Glyph pixels carry `color` with alpha `opacity * coverage`; where glyphs
/// overlap the stronger coverage wins.
pub fn rasterize_text(
    font: &FontVec,
    font_size: u32,
    text: &str,
    color: Rgb<u8>,
    opacity: u8,
) -> RgbaImage {
    #[cfg(test)]
    RASTERIZE_CALLS.with(|calls| calls.set(calls.get() + 1));

    let (width, height) = measure_text(font, font_size, text);
    let mut canvas = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return canvas;
    }

    let scale = PxScale::from(font_size as f32);
    let scaled = font.as_scaled(scale);
    let baseline = scaled.ascent().ceil();

    let mut cursor = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            cursor += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, point(cursor, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return;
                }

                let alpha = (coverage.clamp(0.0, 1.0) * opacity as f32).round() as u8;
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                if alpha > pixel[3] {
                    *pixel = Rgba([color[0], color[1], color[2], alpha]);
                }
            });
        }

        cursor += scaled.h_advance(id);
        prev = Some(id);
    }

    canvas
}

/// Size of the box that holds a `width` x `height` canvas rotated by `degrees`
/// about its centre: `ceil(max) - floor(min)` of the rotated corners.
pub fn expanded_size(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let radians = (degrees as f64).to_radians();
    let (sin, cos) = (radians.sin(), radians.cos());
    let (w, h) = (width as f64, height as f64);
    let (cx, cy) = (w / 2.0, h / 2.0);

    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)] {
        let (dx, dy) = (x - cx, y - cy);
        let rx = cos * dx + sin * dy + cx;
        let ry = -sin * dx + cos * dy + cy;
        min = (min.0.min(rx), min.1.min(ry));
        max = (max.0.max(rx), max.1.max(ry));
    }

    // Trims float noise so exact multiples don't gain a pixel.
    let span = |lo: f64, hi: f64| ((hi - 1e-9).ceil() - (lo + 1e-9).floor()).max(0.0) as u32;
    (span(min.0, max.0), span(min.1, max.1))
}

/// Rotates `canvas` counter-clockwise by `degrees`, growing the output so no
/// rotated pixel is clipped.
pub fn rotate_expand(canvas: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }

    let (out_w, out_h) = expanded_size(width, height, degrees);

    // The source has to fit the working canvas before rotation as well.
    let work_w = out_w.max(width);
    let work_h = out_h.max(height);
    let mut work = RgbaImage::new(work_w, work_h);
    imageops::replace(
        &mut work,
        canvas,
        ((work_w - width) / 2) as i64,
        ((work_h - height) / 2) as i64,
    );

    // imageproc rotates clockwise for positive angles.
    let rotated = rotate_about_center(
        &work,
        -degrees.to_radians(),
        Interpolation::Nearest,
        Rgba([0, 0, 0, 0]),
    );

    imageops::crop_imm(
        &rotated,
        (work_w - out_w) / 2,
        (work_h - out_h) / 2,
        out_w,
        out_h,
    )
    .to_image()
}

pub fn has_visible_pixels(image: &RgbaImage) -> bool {
    image.pixels().any(|p| p[3] > 0)
}
