//! Full-resolution image loading for presentation.
//!
//! The decoded original is resized to its on-screen size straight away and
//! dropped, so only the presented pixels stay resident.

use crate::display::{fit_to_screen, DisplayRect, Placement};
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Refuse anything whose decoded RGBA buffer would exceed 1 GiB.
const MAX_DECODED_BYTES: u64 = 1 << 30;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image {width}×{height} would require ~{estimated_mb}MB to decode")]
    TooLarge {
        width: u32,
        height: u32,
        estimated_mb: u64,
    },
}

/// Read image dimensions from the file header without decoding pixels.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), LoadError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Header check shared by thumbnails and presentations.
pub fn check_decodable(path: &Path) -> Result<(u32, u32), LoadError> {
    let (width, height) = read_dimensions(path)?;
    let estimated = width as u64 * height as u64 * 4;
    if estimated > MAX_DECODED_BYTES {
        return Err(LoadError::TooLarge {
            width,
            height,
            estimated_mb: estimated / (1024 * 1024),
        });
    }
    Ok((width, height))
}

/// Decode pixels, picking the format from the file contents like the header
/// check does, so a mislabelled extension still loads.
pub fn decode(path: &Path) -> Result<image::DynamicImage, LoadError> {
    Ok(image::ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// An image scaled and positioned for a target monitor.
///
/// `placement` is in points; `pixels` holds the placement scaled by the
/// display's pixels per point so HiDPI screens get full resolution.
pub struct Presentation {
    pub path: PathBuf,
    pub pixels: RgbaImage,
    pub placement: Placement,
    pub original_width: u32,
    pub original_height: u32,
}

impl Presentation {
    pub fn open(path: &Path, screen: DisplayRect, pixels_per_point: f32) -> Result<Self, LoadError> {
        let (original_width, original_height) = check_decodable(path)?;
        let placement = fit_to_screen(original_width, original_height, screen);
        let (width, height) = physical_size(&placement, pixels_per_point);

        let decoded = decode(path)?;
        let pixels = if width == original_width && height == original_height {
            decoded.to_rgba8()
        } else {
            decoded
                .resize_exact(width, height, FilterType::Lanczos3)
                .to_rgba8()
        };

        log::info!(
            "presenting {} ({}x{} -> {}x{} px at {},{})",
            path.display(),
            original_width,
            original_height,
            width,
            height,
            placement.x,
            placement.y,
        );

        Ok(Self {
            path: path.to_path_buf(),
            pixels,
            placement,
            original_width,
            original_height,
        })
    }
}

fn physical_size(placement: &Placement, pixels_per_point: f32) -> (u32, u32) {
    let scale = if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
        pixels_per_point
    } else {
        1.0
    };
    let scaled = |points: u32| ((points as f32 * scale).round() as u32).max(1);
    (scaled(placement.width), scaled(placement.height))
}
