//! Placement and scaling math.
//!
//! Pure functions computing where a watermark lands on a base image and how
//! large it should be. No pixel data is touched here.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Anchor point for watermark placement on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Watermark's top-left corner at the base image's top-left corner.
    TopLeft,
    /// Flush with the left and bottom edges.
    BottomLeft,
    /// Flush with the right and top edges.
    TopRight,
    /// Flush with the right and bottom edges.
    BottomRight,
    /// Centered on the base image.
    Center,
}

impl Position {
    /// All valid positions, in the order they are documented.
    pub const ALL: [Position; 5] = [
        Position::TopLeft,
        Position::BottomLeft,
        Position::TopRight,
        Position::BottomRight,
        Position::Center,
    ];

    /// The kebab-case name used on the command line and in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::BottomRight => "bottom-right",
            Position::Center => "center",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top-left" => Ok(Position::TopLeft),
            "bottom-left" => Ok(Position::BottomLeft),
            "top-right" => Ok(Position::TopRight),
            "bottom-right" => Ok(Position::BottomRight),
            "center" => Ok(Position::Center),
            other => Err(Error::InvalidPosition(other.to_string())),
        }
    }
}

/// Calculate where the watermark's top-left corner lands on the base image.
///
/// `base` and `watermark` are `(width, height)` pairs; the watermark is
/// assumed to already be at its final (resized) dimensions. Coordinates may be
/// negative when the watermark is larger than the base image; the compositor
/// clips such overlays rather than rejecting them. Center placement truncates,
/// so an odd leftover pixel pads the bottom-right rather than the top-left.
#[must_use]
pub fn offset(base: (u32, u32), watermark: (u32, u32), position: Position) -> (i64, i64) {
    let (bw, bh) = (i64::from(base.0), i64::from(base.1));
    let (ww, wh) = (i64::from(watermark.0), i64::from(watermark.1));

    match position {
        Position::TopLeft => (0, 0),
        Position::BottomLeft => (0, bh - wh),
        Position::TopRight => (bw - ww, 0),
        Position::BottomRight => (bw - ww, bh - wh),
        Position::Center => ((bw - ww) / 2, (bh - wh) / 2),
    }
}

/// Scale an image size by a factor, truncating each dimension toward zero.
///
/// A factor small enough to truncate a dimension to zero is not rejected
/// here; the resulting empty overlay simply composites nothing.
///
/// # Errors
///
/// Returns [`Error::InvalidScale`] if `scale_factor` is zero, negative, or NaN.
pub fn scaled_size(size: (u32, u32), scale_factor: f64) -> Result<(u32, u32)> {
    if scale_factor <= 0.0 || scale_factor.is_nan() {
        return Err(Error::InvalidScale(scale_factor));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (f64::from(size.0) * scale_factor).trunc() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = (f64::from(size.1) * scale_factor).trunc() as u32;

    Ok((width, height))
}
