//! Logo loading, scaling and placement.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};

use crate::config::LOGO_SAFE_FRACTION;
use crate::error::{Error, Result};
use crate::pipeline::Warning;

/// Open the logo at `path` as RGBA.
///
/// # Errors
///
/// [`Error::MissingInput`] when nothing exists at `path`, [`Error::ImageRead`] when the file is
/// not an image the `image` crate can read.
pub fn load_logo(path: &Path) -> Result<RgbaImage> {
    if !path.is_file() {
        return Err(Error::MissingInput { path: path.to_path_buf() });
    }
    let logo = image::open(path)
        .map_err(|source| Error::ImageRead { path: path.to_path_buf(), source })?
        .to_rgba8();
    info!("Logo loaded successfully: {} ({}x{})", path.display(), logo.width(), logo.height());
    Ok(logo)
}

/// Scale `logo` so it fits a `side` x `side` square, keeping its aspect ratio.
pub fn fit_logo(logo: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = logo.dimensions();
    if w == 0 || h == 0 || side == 0 {
        return RgbaImage::new(0, 0);
    }
    let scale = (side as f64 / w as f64).min(side as f64 / h as f64);
    let nw = ((w as f64 * scale) as u32).max(1);
    let nh = ((h as f64 * scale) as u32).max(1);
    debug!("Resizing logo from {}x{} to {}x{}", w, h, nw, nh);
    imageops::resize(logo, nw, nh, FilterType::Lanczos3)
}

/// Stretch colors away from the mean luminance by `factor`; `1.0` returns the image unchanged
/// and `0.0` a flat grey. Alpha is kept as is.
pub fn enhance_contrast(logo: &RgbaImage, factor: f64) -> RgbaImage {
    let count = (logo.width() as u64 * logo.height() as u64).max(1);
    let total: u64 = logo.pixels().map(|p| luminance(p) as u64).sum();
    let mean = (total as f64 / count as f64).round();

    let mut out = logo.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let value = mean + factor * (*channel as f64 - mean);
            *channel = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn luminance(p: &Rgba<u8>) -> u32 {
    let [r, g, b, _] = p.0;
    (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000
}

/// Warn when a logo spanning `fraction` of the symbol side risks an unreadable code.
pub fn check_logo_size(fraction: f64) -> Option<Warning> {
    if fraction > LOGO_SAFE_FRACTION {
        warn!(
            "Logo spans {:.0}% of the QR code width (safe limit {:.0}%). The code may not scan; consider reducing the logo size.",
            fraction * 100.0,
            LOGO_SAFE_FRACTION * 100.0
        );
        return Some(Warning::LogoTooLarge { fraction });
    }
    None
}

/// Blend `logo` onto the center of `target`.
pub fn place_logo(target: &mut RgbaImage, logo: &RgbaImage) {
    let x = (target.width() as i64 - logo.width() as i64) / 2;
    let y = (target.height() as i64 - logo.height() as i64) / 2;
    imageops::overlay(target, logo, x, y);
    info!("Pasted logo onto soccer ball.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_logo() {
        let err = load_logo(Path::new("no/such/logo.png")).unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_load_corrupt_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_logo(&path).unwrap_err();
        assert!(matches!(err, Error::ImageRead { .. }));
    }

    #[test]
    fn test_load_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(8, 4, Rgba([1, 2, 3, 255])).save(&path).unwrap();
        let logo = load_logo(&path).unwrap();
        assert_eq!(logo.dimensions(), (8, 4));
    }

    #[test]
    fn test_fit_logo_keeps_aspect_ratio() {
        let logo = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
        assert_eq!(fit_logo(&logo, 50).dimensions(), (50, 25));
        let small = RgbaImage::from_pixel(10, 20, Rgba([0, 0, 0, 255]));
        assert_eq!(fit_logo(&small, 40).dimensions(), (20, 40));
    }

    #[test]
    fn test_contrast_identity_and_stretch() {
        let mut logo = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        logo.put_pixel(1, 0, Rgba([200, 200, 200, 128]));
        assert_eq!(enhance_contrast(&logo, 1.0), logo);

        let stretched = enhance_contrast(&logo, 2.0);
        // Mean luminance is 150, so 100 -> 50 and 200 -> 250.
        assert_eq!(*stretched.get_pixel(0, 0), Rgba([50, 50, 50, 255]));
        assert_eq!(*stretched.get_pixel(1, 0), Rgba([250, 250, 250, 128]));
    }

    #[test]
    fn test_contrast_keeps_transparent_frame() {
        let mut logo = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 0]));
        logo.put_pixel(1, 0, Rgba([200, 16, 46, 255]));
        let enhanced = enhance_contrast(&logo, 1.1);
        assert_eq!(enhanced.get_pixel(0, 0)[3], 0);
        assert_eq!(enhanced.get_pixel(2, 0)[3], 0);
        assert_eq!(enhanced.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn test_logo_size_threshold() {
        assert!(check_logo_size(0.175).is_none());
        assert!(matches!(check_logo_size(0.25), Some(Warning::LogoTooLarge { .. })));
    }

    #[test]
    fn test_place_logo_centered() {
        let mut target = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let logo = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        place_logo(&mut target, &logo);
        assert_eq!(*target.get_pixel(3, 3), Rgba([0, 0, 0, 255]));
        assert_eq!(*target.get_pixel(6, 6), Rgba([0, 0, 0, 255]));
        assert_eq!(*target.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*target.get_pixel(7, 7), Rgba([255, 255, 255, 255]));
    }
}
