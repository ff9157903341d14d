mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Cli, Commands, WatermarkArgs};
pub use self::core::processor::ImageProcessor;
pub use self::core::{
    BatchReport, ConfigForm, Result, WatermarkConfig, WatermarkError, DEFAULT_TEXT,
};
pub use processors::{
    alpha_composite, expanded_size, is_supported_format, measure_text, paste_with_mask,
    BatchProcessor, Compressor, Loader, TileGrid, WatermarkRenderer, SUPPORTED_EXTENSIONS,
    TILE_GAP_X, TILE_GAP_Y, TILE_ROTATION_DEGREES,
};
pub use utils::{format_file_size, open_in_file_manager, parse_hex_color};

pub mod prelude {
    pub use crate::{
        BatchProcessor, ImageProcessor, WatermarkConfig, WatermarkError, WatermarkRenderer,
    };
}

// Re-export commonly used types
pub use image::{DynamicImage, RgbImage};
