// ABOUTME: Custom error types for thumbnail embedding with user-friendly messages
// ABOUTME: Separates fatal configuration errors from sink I/O failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Unsupported thumbnail format '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid thumbnail size: {0}")]
    InvalidSize(String),

    #[error("Thumbnail {width}x{height} does not fit a 16-bit binary block")]
    DimensionOverflow { width: u32, height: u32 },

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThumbnailError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            ThumbnailError::UnsupportedFormat(_) => Some("Supported formats are: PNG, JPG, QOI"),
            ThumbnailError::InvalidSize(_) => {
                Some("Sizes are written as WIDTHxHEIGHT, e.g. 16x16, 220x124")
            }
            ThumbnailError::DimensionOverflow { .. } => {
                Some("Binary thumbnail blocks store width and height as 16-bit values (max 65535)")
            }
            ThumbnailError::Io(_) => None,
        }
    }

    /// Whether the error was raised before any output could be produced
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ThumbnailError::UnsupportedFormat(_) | ThumbnailError::InvalidSize(_)
        )
    }
}

pub type Result<T, E = ThumbnailError> = std::result::Result<T, E>;
