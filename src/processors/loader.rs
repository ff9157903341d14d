// watermarker/src/processors/loader.rs
use crate::core::{Result, WatermarkError};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

/// File name suffixes accepted as batch input, compared case-insensitively.
///
/// `.avif` files are listed but the `image` build has no AVIF decoder, so
/// they always come back from [`Loader::load`] as `InvalidImage` and the
/// batch skips them.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".avif"];

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    /// Decodes the image at `path`.
    ///
    /// Failing to open the file is an I/O error; anything that goes wrong
    /// once the bytes are being decoded is reported as `InvalidImage`.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        let file = display_name(path);

        if path.metadata()?.len() == 0 {
            return Err(WatermarkError::InvalidImage {
                file,
                reason: "file is empty".to_string(),
            });
        }

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| WatermarkError::InvalidImage {
                file: file.clone(),
                reason: e.to_string(),
            })?;

        if let Some((max_w, max_h)) = self.max_dimensions {
            let (width, height) = image.dimensions();
            if width > max_w || height > max_h {
                return Err(WatermarkError::InvalidImage {
                    file,
                    reason: format!(
                        "dimensions {}x{} exceed maximum {}x{}",
                        width, height, max_w, max_h
                    ),
                });
            }
        }

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, format: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_supported_format(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let name = name.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
        .unwrap_or(false)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
