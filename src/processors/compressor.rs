// watermarker/src/processors/compressor.rs
use crate::core::Result;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes flattened watermark output. The encoding is always JPEG, whatever
/// extension the target path carries.
pub struct Compressor {
    quality: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn save(&self, image: &RgbImage, path: &Path) -> Result<()> {
        log::debug!(
            "Saving image to {} as JPEG, quality: {}",
            path.display(),
            self.quality
        );

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.quality).encode_image(image)?;
        writer.flush()?;

        self.log_save_result(path)
    }

    fn log_save_result(&self, path: &Path) -> Result<()> {
        let file_size = std::fs::metadata(path)?.len();
        log::debug!("Saved image: {} ({} bytes)", path.display(), file_size);
        Ok(())
    }
}
