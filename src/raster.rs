//! QR matrix generation and rasterization.

use image::{ImageBuffer, RgbaImage};
use log::{debug, info};
use qrcode::{Color as Module, QrCode};

use crate::config::{Ecl, Palette, MAX_CANVAS_PX};
use crate::error::{Error, Result};

/// Modules per side of the smallest QR symbol (version 1).
pub const MIN_MODULES: u32 = 21;

/// Pixel geometry of a rasterized symbol.
///
/// The symbol is the module grid plus its quiet zone. The canvas adds `outer_border` pixels of
/// background around the symbol, half on each side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Modules per side of the QR matrix.
    pub modules: u32,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
    /// Extra background pixels around the symbol.
    pub outer_border: u32,
}

impl Layout {
    /// Build a layout, rejecting any whose canvas would exceed [`MAX_CANVAS_PX`] per side.
    pub fn new(modules: u32, box_size: u32, border: u32, outer_border: u32) -> Result<Self> {
        match canvas_side(modules, box_size, border, outer_border) {
            Some(side) if side <= MAX_CANVAS_PX => Ok(Self { modules, box_size, border, outer_border }),
            _ => Err(Error::invalid(format!(
                "a {}-module code with box size {}, border {} and outer border {} exceeds {} px per side",
                modules, box_size, border, outer_border, MAX_CANVAS_PX
            ))),
        }
    }

    /// Side of the symbol in pixels, quiet zone included.
    pub fn symbol_px(&self) -> u32 {
        (self.modules + 2 * self.border) * self.box_size
    }

    /// Side of the final canvas in pixels.
    pub fn canvas_px(&self) -> u32 {
        self.symbol_px() + self.outer_border
    }

    /// Offset of the symbol's top-left pixel on both axes.
    pub fn symbol_origin(&self) -> u32 {
        self.outer_border / 2
    }

    /// Top-left pixel of module `(x, y)`.
    pub fn module_origin(&self, x: u32, y: u32) -> (u32, u32) {
        let origin = self.symbol_origin() + self.border * self.box_size;
        (origin + x * self.box_size, origin + y * self.box_size)
    }

    /// Module under canvas pixel `(x, y)`, or `None` in the quiet zone and outer border.
    pub fn module_at(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let origin = self.symbol_origin() + self.border * self.box_size;
        let span = self.modules * self.box_size;
        if x < origin || y < origin || x >= origin + span || y >= origin + span {
            return None;
        }
        Some(((x - origin) / self.box_size, (y - origin) / self.box_size))
    }
}

/// Canvas side in pixels, or `None` if it does not fit in a `u32`.
pub fn canvas_side(modules: u32, box_size: u32, border: u32, outer_border: u32) -> Option<u32> {
    border
        .checked_mul(2)?
        .checked_add(modules)?
        .checked_mul(box_size)?
        .checked_add(outer_border)
}

/// The image being composited, together with the layout it was drawn with.
pub struct Canvas {
    pub layout: Layout,
    /// QR version picked by the encoder.
    pub version: i16,
    pub image: RgbaImage,
}

/// Encode `data` into a QR matrix, picking the smallest version that fits.
pub fn encode(data: &str, ecl: Ecl) -> Result<QrCode> {
    if data.is_empty() {
        return Err(Error::invalid("cannot encode an empty url"));
    }
    let code = QrCode::with_error_correction_level(data.as_bytes(), ecl.into())?;
    Ok(code)
}

/// Paint `code` onto a fresh canvas.
///
/// # Arguments
///
/// * `code` - The QR matrix.
/// * `box_size` - Pixels per module.
/// * `border` - Quiet zone width, in modules.
/// * `outer_border` - Extra background pixels around the symbol.
/// * `palette` - Colors for dark modules and background.
///
/// # Errors
///
/// [`Error::InvalidConfig`] when the canvas would be larger than [`MAX_CANVAS_PX`] per side.
pub fn rasterize(
    code: &QrCode,
    box_size: u32,
    border: u32,
    outer_border: u32,
    palette: &Palette,
) -> Result<Canvas> {
    let layout = Layout::new(code.width() as u32, box_size, border, outer_border)?;
    let size = layout.canvas_px();
    let dark = palette.module.rgba();
    let light = palette.background.rgba();

    let mut image: RgbaImage = ImageBuffer::new(size, size);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = match layout.module_at(x, y) {
            Some((mx, my)) if code[(mx as usize, my as usize)] == Module::Dark => dark,
            _ => light,
        };
    }

    let version = match code.version() {
        qrcode::Version::Normal(v) | qrcode::Version::Micro(v) => v,
    };
    debug!("Canvas is {}x{} px, symbol starts at {}", size, size, layout.symbol_origin());
    Ok(Canvas { layout, version, image })
}

/// Encode and rasterize in one step.
pub fn render_symbol(
    data: &str,
    ecl: Ecl,
    box_size: u32,
    border: u32,
    outer_border: u32,
    palette: &Palette,
) -> Result<Canvas> {
    let code = encode(data, ecl)?;
    let canvas = rasterize(&code, box_size, border, outer_border, palette)?;
    info!(
        "QR code created with version {} ({} modules) at error correction {:?}",
        canvas.version, canvas.layout.modules, ecl
    );
    Ok(canvas)
}
