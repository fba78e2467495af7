//! # soccer-qr
//!
//! Generate print-ready QR codes dressed up as a soccer ball.
//!
//! `soccer_qr` encodes a URL with the [`qrcode`] crate, rasterizes it with solid colored modules,
//! repaints the three finder patterns as hollow colored markers, draws a soccer ball (a pentagon
//! ringed by five hexagons) over the center of the symbol and places a logo inside the ball. The
//! result is written as PNG. High error correction keeps the code scannable despite the overlay,
//! and the [`validate`] module reads the output back to prove it.
//!
//! ## Features
//!
//! - Error correction levels L, M, Q and H, with automatic version selection.
//! - Configurable module size, quiet zone and outer border.
//! - Custom colors for modules, finder markers, background and ball seams.
//! - Ball and logo sizes relative to the symbol, with warnings when they threaten scanning.
//! - Optional JSON configuration file, overridable from the command line.
//! - Round-trip validation of the written image.
//!
//! ## Example
//!
//! Generate a code with the default layout and a custom URL:
//!
//! ```no_run
//! use soccer_qr::{generate, Config};
//!
//! let config = Config {
//!     url: "https://example.com".to_string(),
//!     logo_path: "assets/logo_square.png".into(),
//!     output_path: "assets/qr.png".into(),
//!     ..Config::default()
//! };
//! let report = generate(&config).expect("generation failed");
//! println!("wrote {} px image, version {}", report.canvas_px, report.version);
//! ```
//!
//! Compose in memory without touching the filesystem:
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use soccer_qr::{compose, Config};
//!
//! let logo = RgbaImage::from_pixel(64, 64, Rgba([200, 16, 46, 255]));
//! let config = Config { box_size: 4, ..Config::default() };
//! let (canvas, warnings) = compose(&config, &logo).unwrap();
//! assert_eq!(canvas.image.width(), canvas.layout.canvas_px());
//! assert!(warnings.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Run settings, colors and thresholds.
//! - [`raster`]: QR matrix encoding and rasterization.
//! - [`finder`]: Recolored finder markers.
//! - [`ball`]: Soccer ball geometry, rendering and placement.
//! - [`logo`]: Logo loading, scaling and placement.
//! - [`output`]: PNG output.
//! - [`validate`]: Decoding the result back.
//! - [`pipeline`]: The stages chained together.

#![forbid(unsafe_code)]

pub mod ball;
pub mod config;
pub mod error;
pub mod finder;
pub mod logo;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod validate;

pub use config::{Color, Config, Ecl};
pub use error::{Error, Result};
pub use pipeline::{compose, generate, Report, Warning};
pub use validate::Validation;
