//! Overlay a watermark image onto photos.
//!
//! The watermark is resized relative to each base image, masked by its own
//! inverted luminance (darker watermark pixels paste more opaquely), and
//! pasted at one of five anchor positions. Works on a single file or a whole
//! directory of images, writing each result as `watermarked_<name>` in an
//! output directory.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use image_watermark::{ProcessOptions, Position, Watermarker};
//!
//! let wm = Watermarker::open(Path::new("logo.png")).expect("failed to load watermark");
//! let opts = ProcessOptions {
//!     position: Position::BottomRight,
//!     scale_factor: 0.25,
//! };
//! let result = wm.process_file(Path::new("photo.jpg"), Path::new("out"), &opts);
//! assert!(result.is_success());
//! ```
//!
//! # Batch mode
//!
//! ```no_run
//! use std::path::Path;
//!
//! use image_watermark::{ProcessOptions, Watermarker};
//!
//! let wm = Watermarker::open(Path::new("logo.png")).expect("failed to load watermark");
//! let results = wm.process_directory(Path::new("photos"), Path::new("out"), &ProcessOptions::default());
//! for r in &results {
//!     if let Some(e) = &r.error {
//!         eprintln!("{}: {e}", r.path.display());
//!     }
//! }
//! ```
//!
//! Failures are typed ([`Error`]) and isolated per file: one corrupt image in
//! a batch never stops the rest.

#![deny(missing_docs)]

pub mod compositing;
mod engine;
pub mod error;
pub mod geometry;

pub use engine::{
    build_output_path, is_supported_image, save_image, ProcessOptions, ProcessResult, Watermarker,
};
pub use error::{Error, Result};
pub use geometry::Position;
