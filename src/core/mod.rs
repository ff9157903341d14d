// watermarker/src/core/mod.rs
pub mod processor;

use image::Rgb;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TEXT: &str = "© watermarker";

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    pub text: String,
    /// Outline font file; `None` uses the font bundled into the binary.
    pub font_path: Option<PathBuf>,
    pub font_size: u32,
    pub opacity: u8,
    pub margin_x: i32,
    pub margin_y: i32,
    pub color: Rgb<u8>,
    pub quality: u8,
}

/// Raw watermark settings as typed into a form, before any parsing.
#[derive(Debug, Clone, Default)]
pub struct ConfigForm {
    pub text: String,
    pub font_size: String,
    pub opacity: String,
    pub margin_x: String,
    pub margin_y: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub processed: usize,
    pub skipped: Vec<(String, String)>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_path: None,
            font_size: 72,
            opacity: 120,
            margin_x: 25,
            margin_y: -75,
            color: Rgb([255, 255, 255]),
            quality: 90,
        }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(WatermarkError::InvalidConfiguration(
                "Font size must be a positive integer".to_string(),
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(WatermarkError::InvalidConfiguration(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

impl ConfigForm {
    pub fn parse(&self, font_path: Option<&Path>) -> Result<WatermarkConfig> {
        let opacity = parse_integer::<i64>("opacity", &self.opacity)?;
        let opacity = u8::try_from(opacity).map_err(|_| {
            WatermarkError::InvalidConfiguration(
                "Opacity must be between 0 and 255".to_string(),
            )
        })?;

        let config = WatermarkConfig {
            text: self.text.trim().to_string(),
            font_path: font_path.map(Path::to_path_buf),
            font_size: parse_integer("font size", &self.font_size)?,
            opacity,
            margin_x: parse_integer("horizontal margin", &self.margin_x)?,
            margin_y: parse_integer("vertical margin", &self.margin_y)?,
            ..Default::default()
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_integer<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        WatermarkError::InvalidConfiguration(format!(
            "{} must be an integer, got '{}'",
            field, value
        ))
    })
}

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("Not a valid image: {file} ({reason})")]
    InvalidImage { file: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Folder doesn't exist: {0}")]
    FolderNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn form(font_size: &str, opacity: &str, margin_x: &str, margin_y: &str) -> ConfigForm {
        ConfigForm {
            text: "  © studio  ".to_string(),
            font_size: font_size.to_string(),
            opacity: opacity.to_string(),
            margin_x: margin_x.to_string(),
            margin_y: margin_y.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = WatermarkConfig::default();
        assert_eq!(config.font_size, 72);
        assert_eq!(config.opacity, 120);
        assert_eq!(config.margin_x, 25);
        assert_eq!(config.margin_y, -75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_font_size_rejected() {
        let config = WatermarkConfig {
            font_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WatermarkError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_form_parses_and_trims() {
        let config = form("48", "60", "10", "-20")
            .parse(Some(Path::new("font.ttf")))
            .unwrap();
        assert_eq!(config.text, "© studio");
        assert_eq!(config.font_size, 48);
        assert_eq!(config.opacity, 60);
        assert_eq!(config.margin_x, 10);
        assert_eq!(config.margin_y, -20);
        assert_eq!(config.font_path, Some(PathBuf::from("font.ttf")));
    }

    #[test]
    fn test_form_rejects_non_integer() {
        let err = form("big", "60", "0", "0").parse(None).unwrap_err();
        assert!(matches!(err, WatermarkError::InvalidConfiguration(_)));

        let err = form("72", "60", "1.5", "0").parse(None).unwrap_err();
        assert!(matches!(err, WatermarkError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_form_rejects_opacity_out_of_range() {
        for opacity in ["256", "-1", "1000"] {
            let err = form("72", opacity, "0", "0").parse(None).unwrap_err();
            assert!(matches!(err, WatermarkError::InvalidConfiguration(_)));
        }
        assert!(form("72", "255", "0", "0").parse(None).is_ok());
        assert!(form("72", "0", "0", "0").parse(None).is_ok());
    }
}
