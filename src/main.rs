use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info, LevelFilter};

use soccer_qr::validate::validate_file;
use soccer_qr::{generate, Color, Config, Ecl};

#[derive(Parser)]
#[command(name = "soccer-qr")]
#[command(version)]
#[command(about = "Generate a QR code styled as a soccer ball with a centered logo", long_about = None)]
struct Cli {
    #[arg(long, help = "JSON file with default settings, overridden by the flags below")]
    config: Option<PathBuf>,
    #[arg(long, help = "URL for the QR code to point to")]
    url: Option<String>,
    #[arg(long, alias = "logo_path", help = "Logo image placed inside the ball")]
    logo: Option<PathBuf>,
    #[arg(short, long, alias = "output_path", help = "PNG file to write")]
    output: Option<PathBuf>,
    #[arg(long, help = "Also write QR_Example_<w>x<h>.png into this directory")]
    copy_dir: Option<PathBuf>,
    #[arg(long, value_enum, ignore_case = true, help = "Error correction level")]
    ecl: Option<Ecl>,
    #[arg(long, help = "Pixels per module")]
    box_size: Option<u32>,
    #[arg(long, help = "Quiet zone width in modules")]
    border: Option<u32>,
    #[arg(long, help = "Extra white pixels around the code")]
    outer_border: Option<u32>,
    #[arg(long, help = "Ball diameter relative to the QR code height, in (0, 1]")]
    ball_size: Option<f64>,
    #[arg(long, help = "Logo size relative to the ball, in (0, 1]")]
    logo_size: Option<f64>,
    #[arg(long, help = "Logo contrast factor, 1.0 keeps it unchanged")]
    contrast: Option<f64>,
    #[arg(long, value_parser = parse_color, help = "Module color, #RRGGBB or r,g,b")]
    module_color: Option<Color>,
    #[arg(long, value_parser = parse_color, help = "Finder marker color")]
    finder_color: Option<Color>,
    #[arg(long, value_parser = parse_color, help = "Background color")]
    background_color: Option<Color>,
    #[arg(long, value_parser = parse_color, help = "Ball seam color")]
    pattern_color: Option<Color>,
    #[arg(
        long,
        help = "Decode the written image and check it yields the URL",
        long_help = "Decode the written image and check it yields the URL. \
        Exits with an error when the code cannot be read back."
    )]
    validate: bool,
    #[arg(short, long, conflicts_with = "quiet", help = "Log debug details")]
    verbose: bool,
    #[arg(short, long, help = "Only log warnings and errors")]
    quiet: bool,
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    s.parse().map_err(|e: soccer_qr::Error| e.to_string())
}

impl Cli {
    /// Start from the config file (or the defaults) and apply every flag given.
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("could not load config '{}'", path.display()))?,
            None => Config::default(),
        };
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(logo) = self.logo {
            config.logo_path = logo;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.copy_dir.is_some() {
            config.copy_dir = self.copy_dir;
        }
        if let Some(ecl) = self.ecl {
            config.ecl = ecl;
        }
        if let Some(box_size) = self.box_size {
            config.box_size = box_size;
        }
        if let Some(border) = self.border {
            config.border = border;
        }
        if let Some(outer_border) = self.outer_border {
            config.outer_border = outer_border;
        }
        if let Some(ball_size) = self.ball_size {
            config.ball_relative_size = ball_size;
        }
        if let Some(logo_size) = self.logo_size {
            config.logo_relative_size = logo_size;
        }
        if let Some(contrast) = self.contrast {
            config.logo_contrast = contrast;
        }
        if let Some(color) = self.module_color {
            config.palette.module = color;
        }
        if let Some(color) = self.finder_color {
            config.palette.finder = color;
        }
        if let Some(color) = self.background_color {
            config.palette.background = color;
        }
        if let Some(color) = self.pattern_color {
            config.palette.pattern = color;
        }
        Ok(config)
    }
}

fn log_line(buf: &mut impl Write, record: &log::Record) -> std::io::Result<()> {
    writeln!(
        buf,
        "[{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

fn setup_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| log_line(buf, record))
        .try_init()
        .ok();
}

fn run(cli: Cli) -> Result<()> {
    let validate = cli.validate;
    let config = cli.into_config()?;

    info!("Starting Soccer Ball QR Code Generator...");
    let report = generate(&config).context("QR code generation failed")?;
    info!(
        "===== Generation Successful ===== ({} px, version {}, {} warning(s))",
        report.canvas_px,
        report.version,
        report.warnings.len()
    );

    if validate {
        let outcome = validate_file(&config.output_path, &config.url)?;
        if !outcome.is_match() {
            anyhow::bail!("the QR code might be too obscured, please check the size parameters");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    setup_logging(level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
