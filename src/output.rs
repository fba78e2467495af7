//! Writing the finished image.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::info;

use crate::error::{Error, Result};
use crate::raster::Canvas;

/// Save `image` as PNG at `path`, creating missing parent directories first.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let write_error = |source| Error::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| write_error(image::ImageError::IoError(e)))?;
            info!("Created directory: {}", parent.display());
        }
    }
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(write_error)
}

/// File name of the example copy, after the symbol size without the outer border.
pub fn example_file_name(canvas: &Canvas) -> String {
    let side = canvas.layout.symbol_px();
    format!("QR_Example_{}x{}.png", side, side)
}

/// Write the canvas to `output_path` and, when `copy_dir` is given, an example copy inside it.
///
/// Returns every path written, the primary output first.
pub fn write_outputs(canvas: &Canvas, output_path: &Path, copy_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    save_png(&canvas.image, output_path)?;
    info!("QR code saved successfully to: {}", output_path.display());
    let mut written = vec![output_path.to_path_buf()];

    if let Some(dir) = copy_dir {
        let copy = dir.join(example_file_name(canvas));
        save_png(&canvas.image, &copy)?;
        info!("Saved example copy as: {}", copy.display());
        written.push(copy);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Layout;
    use image::Rgba;

    fn canvas() -> Canvas {
        let layout = Layout { modules: 21, box_size: 2, border: 1, outer_border: 4 };
        let side = layout.canvas_px();
        Canvas { layout, version: 1, image: RgbaImage::from_pixel(side, side, Rgba([9, 9, 9, 255])) }
    }

    #[test]
    fn test_example_file_name() {
        assert_eq!(example_file_name(&canvas()), "QR_Example_46x46.png");
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("assets/print/qr.png");
        let copies = dir.path().join("examples");
        let written = write_outputs(&canvas(), &out, Some(&copies)).unwrap();

        assert_eq!(written, vec![out.clone(), copies.join("QR_Example_46x46.png")]);
        let saved = image::open(&out).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (50, 50));
        assert_eq!(*saved.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
        assert!(written[1].is_file());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let err = write_outputs(&canvas(), &blocker.join("qr.png"), None).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
