// watermarker/src/cli.rs
use crate::core::{WatermarkConfig, DEFAULT_TEXT};
use crate::utils::parse_hex_color;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "watermarker", version, about = "Tile a rotated text watermark over images")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watermark every image in a directory
    Batch {
        /// Directory with the source images
        input: PathBuf,

        /// Directory that receives the watermarked copies
        output: PathBuf,

        /// Open the output directory in the file manager when done
        #[arg(long)]
        open: bool,

        #[command(flatten)]
        watermark: WatermarkArgs,
    },
    /// Watermark a single image
    Apply {
        input: PathBuf,

        output: PathBuf,

        #[command(flatten)]
        watermark: WatermarkArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WatermarkArgs {
    /// Watermark text
    #[arg(short, long, default_value = DEFAULT_TEXT)]
    pub text: String,

    /// Outline font (TTF/OTF) used to draw the text [default: bundled DejaVu Sans]
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, default_value_t = 72, value_parser = clap::value_parser!(u32).range(1..))]
    pub font_size: u32,

    /// Text opacity (0-255)
    #[arg(long, default_value_t = 120)]
    pub opacity: u8,

    /// Horizontal offset of the tile grid
    #[arg(long, default_value_t = 25, allow_negative_numbers = true)]
    pub margin_x: i32,

    /// Vertical offset of the tile grid
    #[arg(long, default_value_t = -75, allow_negative_numbers = true)]
    pub margin_y: i32,

    /// Text color as #RGB or #RRGGBB
    #[arg(long, default_value = "#FFFFFF")]
    pub color: String,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

impl WatermarkArgs {
    pub fn into_config(self) -> crate::core::Result<WatermarkConfig> {
        let config = WatermarkConfig {
            text: self.text,
            font_path: self.font,
            font_size: self.font_size,
            opacity: self.opacity,
            margin_x: self.margin_x,
            margin_y: self.margin_y,
            color: parse_hex_color(&self.color)?,
            quality: self.quality,
        };

        config.validate()?;
        Ok(config)
    }
}
