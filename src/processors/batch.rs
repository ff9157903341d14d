// watermarker/src/processors/batch.rs
use crate::core::{BatchReport, Result, WatermarkConfig, WatermarkError};
use crate::processors::loader::{display_name, is_supported_format};
use crate::processors::{Compressor, Loader, WatermarkRenderer};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Watermarks every eligible image of a directory, one file at a time.
///
/// The renderer (and its rotated text tile) is built once in
/// [`BatchProcessor::new`]; a font that fails to load aborts before any file
/// is read.
pub struct BatchProcessor {
    loader: Loader,
    renderer: WatermarkRenderer,
    compressor: Compressor,
}

impl BatchProcessor {
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

    /// Processes `input_dir` into `output_dir`.
    ///
    /// `on_progress(index, total, filename)` fires once per written file;
    /// `index` is the 1-based position in the eligible list, so it skips
    /// ahead past files that failed to decode. Decode failures are logged
    /// and recorded in the report. Write failures abort the run.
    pub fn run<F>(&self, input_dir: &Path, output_dir: &Path, mut on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(usize, usize, &str),
    {
        self.validate_paths(input_dir, output_dir)?;
        std::fs::create_dir_all(output_dir)?;

        let files = self.collect_image_paths(input_dir)?;
        let total = files.len();
        let mut report = BatchReport {
            total,
            ..Default::default()
        };

        if files.is_empty() {
            log::warn!("No image files found in {}", input_dir.display());
            return Ok(report);
        }

        log::info!("Processing {} images from {}", total, input_dir.display());

        for (index, input_path) in files.iter().enumerate() {
            let index = index + 1;
            let filename = display_name(input_path);

            let image = match self.loader.load(input_path) {
                Ok(image) => image,
                Err(WatermarkError::InvalidImage { file, reason }) => {
                    log::warn!("Skipping invalid file: {} ({})", file, reason);
                    report.skipped.push((file, reason));
                    continue;
                }
                Err(e) => return Err(e),
            };

            let watermarked = self.renderer.render_onto(&image);
            let output_path = output_dir.join(&filename);
            self.compressor.save(&watermarked, &output_path)?;

            report.processed += 1;
            on_progress(index, total, &filename);
            log::info!("Saved watermarked image: {}", filename);
        }

        log::info!(
            "Watermarked {} of {} images into {}",
            report.processed,
            total,
            output_dir.display()
        );

        Ok(report)
    }

    /// Eligible files directly inside `input_dir`, in directory listing order.
    /// Symlinks are followed; dangling ones are logged and left out.
    pub fn collect_image_paths(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let paths = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Cannot read directory entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_supported_format(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        Ok(paths)
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.exists() {
            return Err(WatermarkError::InvalidPath(format!(
                "Input directory does not exist: {}",
                input_dir.display()
            )));
        }

        if !input_dir.is_dir() {
            return Err(WatermarkError::InvalidPath(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(WatermarkError::InvalidPath(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        // Writing next to the sources would overwrite them.
        if input_dir == output_dir {
            return Err(WatermarkError::InvalidPath(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}
