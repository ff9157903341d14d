// watermarker/src/utils/mod.rs
use crate::core::{Result, WatermarkError};
use image::Rgb;
use std::path::Path;
use std::process::Command;

/// Opens `path` in the platform's file manager.
pub fn open_in_file_manager(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(WatermarkError::FolderNotFound(path.to_path_buf()));
    }

    let program = file_manager_command();
    log::debug!("Opening {} with {}", path.display(), program);

    Command::new(program).arg(path).spawn()?;
    Ok(())
}

fn file_manager_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Parses `#RGB` or `#RRGGBB`.
pub fn parse_hex_color(hex: &str) -> Result<Rgb<u8>> {
    let digits = hex.trim().strip_prefix('#').ok_or_else(|| {
        WatermarkError::InvalidConfiguration(format!("Color must start with '#', got '{}'", hex))
    })?;

    let invalid =
        || WatermarkError::InvalidConfiguration(format!("Invalid hex color: '{}'", hex));

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match digits.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, channel) in rgb.iter_mut().enumerate() {
                let value = u8::from_str_radix(&digits[i..i + 1], 16).map_err(|_| invalid())?;
                *channel = value * 17;
            }
            Ok(Rgb(rgb))
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, channel) in rgb.iter_mut().enumerate() {
                *channel =
                    u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            }
            Ok(Rgb(rgb))
        }
        _ => Err(invalid()),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as i32).min(UNITS.len() as i32 - 1);
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}
