// watermarker/src/processors/renderer.rs
use crate::core::{Result, WatermarkConfig};
use crate::processors::text::{self, TILE_ROTATION_DEGREES};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use std::sync::Arc;

/// Gap added to the tile width between horizontal neighbours.
pub const TILE_GAP_X: u32 = 50;
/// Gap added to the tile height between vertical neighbours.
pub const TILE_GAP_Y: u32 = 100;

/// Paste origins of the watermark tiles over a `width` x `height` canvas.
///
/// The grid starts one canvas before the top-left corner (shifted by the
/// margins) and runs to two canvases past it, so rotation overhang and
/// negative margins never leave an uncovered edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
    pub step_x: i64,
    pub step_y: i64,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile: (u32, u32), margin: (i32, i32)) -> Self {
        let (width, height) = (width as i64, height as i64);
        Self {
            start_x: -width + margin.0 as i64,
            start_y: -height + margin.1 as i64,
            end_x: width * 2,
            end_y: height * 2,
            step_x: tile.0 as i64 + TILE_GAP_X as i64,
            step_y: tile.1 as i64 + TILE_GAP_Y as i64,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = i64> + Clone {
        axis(self.start_x, self.end_x, self.step_x)
    }

    pub fn rows(&self) -> impl Iterator<Item = i64> + Clone {
        axis(self.start_y, self.end_y, self.step_y)
    }

    /// Row-major paste origins.
    pub fn origins(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let columns = self.columns();
        self.rows()
            .flat_map(move |y| columns.clone().map(move |x| (x, y)))
    }
}

fn axis(start: i64, end: i64, step: i64) -> impl Iterator<Item = i64> + Clone {
    (start..end).step_by(step.max(1) as usize)
}

/// Tiles a pre-rotated text watermark over images.
///
/// The tile is rasterized once in [`WatermarkRenderer::new`] and shared
/// read-only by every call to [`WatermarkRenderer::render_onto`].
#[derive(Debug, Clone)]
pub struct WatermarkRenderer {
    config: WatermarkConfig,
    tile: Arc<RgbaImage>,
    visible: bool,
}

impl WatermarkRenderer {
    pub fn new(config: WatermarkConfig) -> Result<Self> {
        config.validate()?;

        let font = text::load_font(config.font_path.as_deref())?;
        let canvas = text::rasterize_text(
            &font,
            config.font_size,
            &config.text,
            config.color,
            config.opacity,
        );
        let tile = text::rotate_expand(&canvas, TILE_ROTATION_DEGREES);
        let visible = text::has_visible_pixels(&tile);

        log::debug!(
            "Prepared watermark tile: text {}x{}, rotated {}x{}",
            canvas.width(),
            canvas.height(),
            tile.width(),
            tile.height()
        );

        Ok(Self {
            config,
            tile: Arc::new(tile),
            visible,
        })
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    pub fn tile(&self) -> &Arc<RgbaImage> {
        &self.tile
    }

    pub fn tile_grid(&self, width: u32, height: u32) -> TileGrid {
        TileGrid::new(
            width,
            height,
            self.tile.dimensions(),
            (self.config.margin_x, self.config.margin_y),
        )
    }

    /// Returns `image` with the watermark composited on top, flattened to RGB.
    pub fn render_onto(&self, image: &DynamicImage) -> RgbImage {
        let mut base = image.to_rgba8();

        if self.visible {
            let layer = self.build_layer(base.width(), base.height());
            alpha_composite(&mut base, &layer);
        }

        DynamicImage::ImageRgba8(base).to_rgb8()
    }

    fn build_layer(&self, width: u32, height: u32) -> RgbaImage {
        let mut layer = RgbaImage::new(width, height);
        let grid = self.tile_grid(width, height);

        for (x, y) in grid.origins() {
            paste_with_mask(&mut layer, &self.tile, x, y);
        }

        layer
    }
}

/// Pastes `tile` at (`x`, `y`) using the tile's own alpha as the mask:
/// every channel becomes `tile * a + dst * (1 - a)`.
pub fn paste_with_mask(layer: &mut RgbaImage, tile: &RgbaImage, x: i64, y: i64) {
    let (lw, lh) = (layer.width() as i64, layer.height() as i64);
    let (tw, th) = (tile.width() as i64, tile.height() as i64);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + tw).min(lw);
    let y1 = (y + th).min(lh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for ly in y0..y1 {
        for lx in x0..x1 {
            let src = tile.get_pixel((lx - x) as u32, (ly - y) as u32);
            let mask = src[3] as u32;
            if mask == 0 {
                continue;
            }

            let dst = layer.get_pixel_mut(lx as u32, ly as u32);
            if mask == 255 {
                *dst = *src;
                continue;
            }

            let mut out = [0u8; 4];
            for (c, channel) in out.iter_mut().enumerate() {
                let value = src[c] as u32 * mask + dst[c] as u32 * (255 - mask);
                *channel = ((value + 127) / 255) as u8;
            }
            *dst = Rgba(out);
        }
    }
}

/// Porter-Duff "over": composites `layer` on top of `base` in place.
pub fn alpha_composite(base: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        let top_alpha = src[3];
        if top_alpha == 0 {
            continue;
        }
        if top_alpha == 255 {
            *dst = *src;
            continue;
        }

        let ta = top_alpha as f32 / 255.0;
        let ba = dst[3] as f32 / 255.0;
        let out_alpha = ta + ba * (1.0 - ta);
        if out_alpha <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            continue;
        }

        let blend = |t: u8, b: u8| -> u8 {
            let value = (t as f32 * ta + b as f32 * ba * (1.0 - ta)) / out_alpha;
            value.round().clamp(0.0, 255.0) as u8
        };

        *dst = Rgba([
            blend(src[0], dst[0]),
            blend(src[1], dst[1]),
            blend(src[2], dst[2]),
            (out_alpha * 255.0).round() as u8,
        ]);
    }
}
