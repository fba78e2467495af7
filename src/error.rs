//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

/// Everything that can stop a generation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input file (the logo, a config file) does not exist.
    #[error("file not found: '{}'", path.display())]
    MissingInput { path: PathBuf },

    /// A configuration value is out of its accepted range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The data could not be encoded as a QR symbol.
    #[error("failed to encode QR data: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The file exists but is not a readable image.
    #[error("failed to read image '{}': {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The composited image could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
