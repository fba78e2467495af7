//! Read a generated image back and check what it decodes to.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use log::{error, info};

use crate::error::{Error, Result};

/// Result of scanning an image for the expected payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// A symbol decoded to the expected data.
    Match,
    /// Symbols were found but none carried the expected data; holds the first payload read.
    Mismatch { found: String },
    /// No readable symbol in the image.
    NotFound,
}

impl Validation {
    pub fn is_match(&self) -> bool {
        matches!(self, Validation::Match)
    }
}

/// Decode every QR symbol in `image` and compare the payloads against `expected`.
pub fn validate_image(image: &RgbaImage, expected: &str) -> Validation {
    let grey = DynamicImage::ImageRgba8(image.clone()).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        grey.width() as usize,
        grey.height() as usize,
        |x, y| grey.get_pixel(x as u32, y as u32)[0],
    );
    let payloads: Vec<String> = prepared
        .detect_grids()
        .into_iter()
        .filter_map(|grid| grid.decode().ok().map(|(_, content)| content))
        .collect();

    if payloads.iter().any(|p| p == expected) {
        return Validation::Match;
    }
    match payloads.into_iter().next() {
        Some(found) => Validation::Mismatch { found },
        None => Validation::NotFound,
    }
}

/// Open the PNG at `path` and validate it, logging the outcome.
pub fn validate_file(path: &Path, expected: &str) -> Result<Validation> {
    if !path.is_file() {
        return Err(Error::MissingInput { path: path.to_path_buf() });
    }
    info!("--- Running Validation on {} ---", path.display());
    let image = image::open(path)
        .map_err(|source| Error::ImageRead { path: path.to_path_buf(), source })?
        .to_rgba8();
    let outcome = validate_image(&image, expected);
    match &outcome {
        Validation::Match => info!("VALIDATION SUCCESS: Found QR code with matching data: {}", expected),
        Validation::Mismatch { found } => {
            error!("VALIDATION FAILED: Found a QR code, but data does not match.");
            error!("  Expected: {}", expected);
            error!("  Found:    {}", found);
        }
        Validation::NotFound => error!("VALIDATION FAILED: No QR code found in the generated image."),
    }
    Ok(outcome)
}
