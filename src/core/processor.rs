// watermarker/src/core/processor.rs
use super::{Result, WatermarkConfig, WatermarkError};
use crate::processors::{Compressor, Loader, WatermarkRenderer};
use std::path::Path;

/// Single-file pipeline: decode, watermark, write a flattened JPEG.
pub struct ImageProcessor {
    loader: Loader,
    renderer: WatermarkRenderer,
    compressor: Compressor,
}

impl ImageProcessor {
    pub fn new(config: WatermarkConfig) -> Result<Self> {
        let compressor = Compressor::new(config.quality);
        let renderer = WatermarkRenderer::new(config)?;

        Ok(Self {
            loader: Loader::new(),
            renderer,
            compressor,
        })
    }

    pub fn renderer(&self) -> &WatermarkRenderer {
        &self.renderer
    }

    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_path: Q) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        self.validate_paths(input_path, output_path)?;

        let image = self.loader.load(input_path)?;
        let watermarked = self.renderer.render_onto(&image);
        self.compressor.save(&watermarked, output_path)
    }

    fn validate_paths(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        if !input_path.is_file() {
            return Err(WatermarkError::InvalidPath(format!(
                "Input file does not exist: {}",
                input_path.display()
            )));
        }

        if output_path.is_dir() {
            return Err(WatermarkError::InvalidPath(format!(
                "Output path is a directory: {}",
                output_path.display()
            )));
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(())
    }
}
