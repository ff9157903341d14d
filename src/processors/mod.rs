// watermarker/src/processors/mod.rs
mod batch;
mod compressor;
mod loader;
mod renderer;
mod text;

pub use batch::BatchProcessor;
pub use compressor::Compressor;
pub use loader::{is_supported_format, Loader, SUPPORTED_EXTENSIONS};
pub use renderer::{
    alpha_composite, paste_with_mask, TileGrid, WatermarkRenderer, TILE_GAP_X, TILE_GAP_Y,
};
pub use text::{expanded_size, measure_text, TILE_ROTATION_DEGREES};

pub mod prelude {
    pub use super::{BatchProcessor, Compressor, Loader, WatermarkRenderer};
}
