//! The generation pipeline: encode, rasterize, decorate, place the logo, write.

use std::fmt;
use std::path::PathBuf;

use image::RgbaImage;
use log::info;

use crate::ball::{self, BallPattern};
use crate::config::Config;
use crate::error::Result;
use crate::finder::paint_finders;
use crate::logo;
use crate::output::write_outputs;
use crate::raster::{render_symbol, Canvas};

/// A threshold was crossed; the image is still produced but may scan poorly.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// The ball hides `percent` of the symbol area.
    BallCoverage { percent: f64 },
    /// The logo spans `fraction` of the symbol side.
    LogoTooLarge { fraction: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::BallCoverage { percent } => {
                write!(f, "soccer ball covers {:.1}% of the QR code", percent)
            }
            Warning::LogoTooLarge { fraction } => {
                write!(f, "logo spans {:.1}% of the QR code width", fraction * 100.0)
            }
        }
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug)]
pub struct Report {
    /// QR version picked by the encoder.
    pub version: i16,
    /// Side of the written image in pixels.
    pub canvas_px: u32,
    /// Diameter of the ball overlay in pixels.
    pub ball_px: u32,
    pub warnings: Vec<Warning>,
    /// Files written, primary output first.
    pub written: Vec<PathBuf>,
}

/// Build the decorated image in memory, validating `config` first.
///
/// `crest` is the already loaded logo raster; see [`logo::load_logo`].
pub fn compose(config: &Config, crest: &RgbaImage) -> Result<(Canvas, Vec<Warning>)> {
    config.validate()?;
    let mut warnings = Vec::new();

    let mut canvas = render_symbol(
        &config.url,
        config.ecl,
        config.box_size,
        config.border,
        config.outer_border,
        &config.palette,
    )?;
    paint_finders(&mut canvas, &config.palette);

    let ball_px = ball::ball_size(&canvas.layout, config.ball_relative_size);
    let mut ball = BallPattern::new(ball_px, &config.geometry).render(&config.palette);
    info!("Created soccer ball pattern ({} px).", ball_px);

    let logo_side = (ball_px as f64 * config.logo_relative_size) as u32;
    let fitted = logo::fit_logo(crest, logo_side);
    let enhanced = logo::enhance_contrast(&fitted, config.logo_contrast);
    logo::place_logo(&mut ball, &enhanced);
    warnings.extend(logo::check_logo_size(config.logo_fraction()));

    warnings.extend(ball::check_coverage(ball_px, &canvas.layout));
    ball::overlay_ball(&mut canvas, &ball);
    Ok((canvas, warnings))
}

/// Run the whole pipeline for `config`, writing every configured output.
///
/// The logo is loaded and the config checked before anything is written, so a missing logo or an
/// invalid config leaves no file behind.
pub fn generate(config: &Config) -> Result<Report> {
    let crest = logo::load_logo(&config.logo_path)?;
    let (canvas, warnings) = compose(config, &crest)?;
    let written = write_outputs(&canvas, &config.output_path, config.copy_dir.as_deref())?;
    info!("QR code generation complete.");
    Ok(Report {
        version: canvas.version,
        canvas_px: canvas.layout.canvas_px(),
        ball_px: ball::ball_size(&canvas.layout, config.ball_relative_size),
        warnings,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Ecl;
    use crate::error::Error;
    use image::Rgba;

    fn small_config() -> Config {
        Config {
            url: "https://example.com".to_string(),
            ecl: Ecl::H,
            box_size: 6,
            border: 4,
            outer_border: 10,
            ..Config::default()
        }
    }

    fn crest() -> RgbaImage {
        RgbaImage::from_pixel(40, 40, Rgba([10, 120, 40, 255]))
    }

    #[test]
    fn test_compose_dimensions() {
        let config = small_config();
        let (canvas, warnings) = compose(&config, &crest()).unwrap();
        let modules = canvas.layout.modules;
        assert_eq!(canvas.image.width(), (modules + 8) * 6 + 10);
        assert_eq!(canvas.image.width(), canvas.image.height());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_compose_places_logo_at_center() {
        let config = Config { logo_contrast: 1.0, ..small_config() };
        let (canvas, _) = compose(&config, &crest()).unwrap();
        let mid = canvas.image.width() / 2;
        assert_eq!(*canvas.image.get_pixel(mid, mid), Rgba([10, 120, 40, 255]));
    }

    #[test]
    fn test_large_logo_warns_but_composes() {
        let config = Config { ball_relative_size: 0.3, logo_relative_size: 0.9, ..small_config() };
        let (_, warnings) = compose(&config, &crest()).unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::LogoTooLarge { .. })));
    }

    #[test]
    fn test_invalid_ratio_is_rejected() {
        let config = Config { ball_relative_size: 2.0, ..small_config() };
        assert!(compose(&config, &crest()).is_err());
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        let config = Config { box_size: 200_000_000, ..small_config() };
        assert!(matches!(compose(&config, &crest()), Err(Error::InvalidConfig(_))));

        // A version 1 symbol would fit at this box size, the version 4 default url does not.
        let config = Config { box_size: 800, ..Config::default() };
        assert!(config.validate().is_ok());
        assert!(matches!(compose(&config, &crest()), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_warning_display() {
        let w = Warning::LogoTooLarge { fraction: 0.25 };
        assert_eq!(w.to_string(), "logo spans 25.0% of the QR code width");
    }
}
