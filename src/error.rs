//! Error types for the image-watermark crate.

use std::path::PathBuf;

/// Errors that can occur while watermarking images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The scale factor was not a positive number.
    #[error("scale factor must be greater than 0 (got {0})")]
    InvalidScale(f64),

    /// The position name is not one of the recognized anchors.
    #[error(
        "invalid position {0:?} (expected one of: top-left, bottom-left, \
         top-right, bottom-right, center)"
    )]
    InvalidPosition(String),

    /// An input path does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format is not supported by the encoder.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
