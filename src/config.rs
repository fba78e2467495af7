//! Generation settings.
//!
//! [`Config`] carries every knob of a run. Defaults reproduce the AYSO Region 154 print layout;
//! a JSON file can override any subset of fields, and the command line overrides the file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::{canvas_side, MIN_MODULES};

/// Ball coverage of the symbol area, in percent, above which scanning gets unreliable.
pub const BALL_COVERAGE_WARN_PERCENT: f64 = 25.0;

/// Largest canvas side, in pixels, the generator agrees to allocate.
pub const MAX_CANVAS_PX: u32 = 32_768;

/// Largest logo side, as a fraction of the symbol side, considered safe to scan.
pub const LOGO_SAFE_FRACTION: f64 = 0.2;

/// An opaque RGB color.
///
/// Parsed from `#RRGGBB` (the `#` is optional) or from a comma separated `r,g,b` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const NAVY_BLUE: Color = Color([0, 0, 102]);
    pub const VIBRANT_RED: Color = Color([200, 16, 46]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const LIGHT_GRAY: Color = Color([160, 160, 160]);

    pub fn rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(Error::invalid(format!("color '{}' must have three components", s)));
            }
            let mut rgb = [0u8; 3];
            for (slot, part) in rgb.iter_mut().zip(&parts) {
                *slot = part
                    .parse()
                    .map_err(|_| Error::invalid(format!("color component '{}' is not in 0..=255", part)))?;
            }
            return Ok(Color(rgb));
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid(format!("color '{}' is not #RRGGBB or r,g,b", s)));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color([r, g, b])),
            _ => Err(Error::invalid(format!("color '{}' is not #RRGGBB or r,g,b", s))),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// QR error correction level, from lowest to highest redundancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Ecl {
    /// Recovers about 7% of the symbol.
    L,
    /// Recovers about 15% of the symbol.
    M,
    /// Recovers about 25% of the symbol.
    Q,
    /// Recovers about 30% of the symbol.
    H,
}

impl From<Ecl> for qrcode::EcLevel {
    fn from(value: Ecl) -> Self {
        match value {
            Ecl::L => qrcode::EcLevel::L,
            Ecl::M => qrcode::EcLevel::M,
            Ecl::Q => qrcode::EcLevel::Q,
            Ecl::H => qrcode::EcLevel::H,
        }
    }
}

/// Colors used when painting the symbol and its decorations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Dark modules.
    pub module: Color,
    /// Finder markers.
    pub finder: Color,
    /// Light modules, the ball disc and the outer border.
    pub background: Color,
    /// Ball seams.
    pub pattern: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            module: Color::NAVY_BLUE,
            finder: Color::VIBRANT_RED,
            background: Color::WHITE,
            pattern: Color::LIGHT_GRAY,
        }
    }
}

/// Shape factors of the ball pattern, all relative to the ball radius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallGeometry {
    pub pentagon_radius_factor: f64,
    pub hexagon_radius_factor: f64,
    pub hexagon_distance_factor: f64,
}

impl Default for BallGeometry {
    fn default() -> Self {
        Self {
            pentagon_radius_factor: 0.18,
            hexagon_radius_factor: 0.16,
            hexagon_distance_factor: 0.3,
        }
    }
}

/// Settings of one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data encoded in the symbol.
    pub url: String,
    pub logo_path: PathBuf,
    pub output_path: PathBuf,
    /// When set, a copy named after the symbol dimensions is written here too.
    pub copy_dir: Option<PathBuf>,
    pub ecl: Ecl,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
    /// Extra pixels around the symbol, split evenly between both sides.
    pub outer_border: u32,
    /// Ball diameter relative to the symbol height.
    pub ball_relative_size: f64,
    /// Logo side relative to the ball diameter.
    pub logo_relative_size: f64,
    /// Contrast factor applied to the logo, `1.0` leaves it untouched.
    pub logo_contrast: f64,
    pub geometry: BallGeometry,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "https://www.ayso154cypress.org".to_string(),
            logo_path: PathBuf::from("logo_square.png"),
            output_path: PathBuf::from("AYSO_Homepage_QR_Print.png"),
            copy_dir: None,
            ecl: Ecl::H,
            box_size: 35,
            border: 6,
            outer_border: 20,
            ball_relative_size: 0.25,
            logo_relative_size: 0.7,
            logo_contrast: 1.1,
            geometry: BallGeometry::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file. Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingInput { path: path.to_path_buf() });
        }
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::invalid(format!("cannot parse '{}': {}", path.display(), e)))
    }

    /// Reject values that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::invalid("url must not be empty"));
        }
        if self.box_size == 0 {
            return Err(Error::invalid("box size must be at least 1"));
        }
        // Even a version 1 symbol must fit; larger versions are checked once the matrix is known.
        match canvas_side(MIN_MODULES, self.box_size, self.border, self.outer_border) {
            Some(side) if side <= MAX_CANVAS_PX => {}
            _ => {
                return Err(Error::invalid(format!(
                    "box size {}, border {} and outer border {} exceed {} px per side",
                    self.box_size, self.border, self.outer_border, MAX_CANVAS_PX
                )))
            }
        }
        check_fraction("ball relative size", self.ball_relative_size)?;
        check_fraction("logo relative size", self.logo_relative_size)?;
        check_fraction("pentagon radius factor", self.geometry.pentagon_radius_factor)?;
        check_fraction("hexagon radius factor", self.geometry.hexagon_radius_factor)?;
        check_fraction("hexagon distance factor", self.geometry.hexagon_distance_factor)?;
        if !self.logo_contrast.is_finite() || self.logo_contrast <= 0.0 {
            return Err(Error::invalid(format!(
                "logo contrast must be a positive number, got {}",
                self.logo_contrast
            )));
        }
        Ok(())
    }

    /// Logo side as a fraction of the symbol side.
    pub fn logo_fraction(&self) -> f64 {
        self.ball_relative_size * self.logo_relative_size
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("{} must be in (0, 1], got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!("#C8102E".parse::<Color>().unwrap(), Color::VIBRANT_RED);
        assert_eq!("000066".parse::<Color>().unwrap(), Color::NAVY_BLUE);
    }

    #[test]
    fn test_parse_triple_color() {
        assert_eq!("160, 160, 160".parse::<Color>().unwrap(), Color::LIGHT_GRAY);
        assert!("1,2".parse::<Color>().is_err());
        assert!("1,2,300".parse::<Color>().is_err());
    }

    #[test]
    fn test_reject_malformed_color() {
        assert!("#GG0000".parse::<Color>().is_err());
        assert!("#FFF".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::NAVY_BLUE.to_string(), "#000066");
    }

    #[test]
    fn test_out_of_range_ratios_are_rejected() {
        let mut config = Config::default();
        config.ball_relative_size = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.logo_relative_size = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.geometry.hexagon_distance_factor = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_url_and_zero_box_are_rejected() {
        let mut config = Config::default();
        config.url = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.box_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_layout_values_are_rejected() {
        for config in [
            Config { box_size: 200_000_000, ..Config::default() },
            Config { box_size: 100_000, ..Config::default() },
            Config { border: u32::MAX, ..Config::default() },
            Config { outer_border: u32::MAX, ..Config::default() },
        ] {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r##"{"url": "https://example.com", "palette": {"finder": "#00FF00"}, "ecl": "Q"}"##,
        )
        .unwrap();
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.palette.finder, Color([0, 255, 0]));
        assert_eq!(config.palette.module, Color::NAVY_BLUE);
        assert_eq!(config.ecl, Ecl::Q);
        assert_eq!(config.box_size, 35);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_logo_fraction() {
        let config = Config::default();
        assert!((config.logo_fraction() - 0.175).abs() < 1e-9);
    }
}
