//! Core watermarking engine.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::compositing;
use crate::error::{Error, Result};
use crate::geometry::{self, Position};

/// File name prefix applied to every watermarked output.
const OUTPUT_PREFIX: &str = "watermarked_";

/// Options controlling watermark placement and size.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Anchor point for the watermark on each base image.
    pub position: Position,
    /// Watermark target size as a fraction of the base image's dimensions.
    pub scale_factor: f64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            position: Position::Center,
            scale_factor: 0.5,
        }
    }
}

/// Result of processing a single image file.
///
/// Failures are carried as a typed [`Error`] so callers can branch on the
/// kind instead of parsing message text.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Path the watermarked image was written to, on success.
    pub output: Option<PathBuf>,
    /// The failure, if any.
    pub error: Option<Error>,
}

impl ProcessResult {
    /// Whether the file was watermarked and saved.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The watermarking engine holding the decoded watermark image.
///
/// Create once with [`Watermarker::open`] and reuse across a whole batch;
/// the watermark is decoded a single time and resized per base image.
pub struct Watermarker {
    watermark: RgbImage,
}

impl Watermarker {
    /// Load the watermark image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path does not exist, or
    /// [`Error::Image`] if it cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let watermark = image::open(path)?.to_rgb8();
        Ok(Self { watermark })
    }

    /// Build a watermarker from an already-decoded image.
    #[must_use]
    pub fn from_image(watermark: RgbImage) -> Self {
        Self { watermark }
    }

    /// Apply the watermark to a base image in memory.
    ///
    /// The watermark is resized to `scale_factor` times the *base* image's
    /// dimensions, masked by its own inverted luminance, and pasted at the
    /// offset the position dictates. No I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] if `scale_factor` is not positive.
    pub fn apply(&self, base: &mut RgbImage, position: Position, scale_factor: f64) -> Result<()> {
        let (target_w, target_h) = geometry::scaled_size(base.dimensions(), scale_factor)?;
        let resized = imageops::resize(&self.watermark, target_w, target_h, FilterType::Lanczos3);
        let mask = compositing::luminance_mask(&resized);
        let (x, y) = geometry::offset(base.dimensions(), resized.dimensions(), position);
        compositing::paste_with_mask(base, &resized, &mask, x, y);
        Ok(())
    }

    /// Process a single image file: load, watermark, save.
    ///
    /// The output lands at `output_dir/watermarked_<file_name>`; the directory
    /// is created if absent. Validation and compositing happen before any
    /// write, so a failing invocation leaves no partial output file.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> ProcessResult {
        match self.watermark_file(input, output_dir, opts) {
            Ok(output) => ProcessResult {
                path: input.to_path_buf(),
                output: Some(output),
                error: None,
            },
            Err(e) => ProcessResult {
                path: input.to_path_buf(),
                output: None,
                error: Some(e),
            },
        }
    }

    fn watermark_file(
        &self,
        input: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Result<PathBuf> {
        let file_name = input
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::InvalidArgument(format!("bad file name: {}", input.display())))?;
        let output = build_output_path(file_name, output_dir)?;

        let mut base = image::open(input)?.to_rgb8();
        self.apply(&mut base, opts.position, opts.scale_factor)?;

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)?;
        }
        save_image(&base, &output)?;
        Ok(output)
    }

    /// Process every eligible image file in a directory.
    ///
    /// Eligible means a plain file whose lowercased extension is one of
    /// jpg, jpeg, png, gif, bmp; everything else, subdirectories included,
    /// is skipped without comment and nothing recurses. Each file is
    /// processed independently, so one corrupt image never stops the rest.
    ///
    /// Files are processed in parallel when the `cli` feature is enabled
    /// (via rayon); results keep the directory listing order either way.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult {
                    path: input_dir.to_path_buf(),
                    output: None,
                    error: Some(Error::Io(e)),
                }];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult {
                    path: output_dir.to_path_buf(),
                    output: None,
                    error: Some(Error::Io(e)),
                }];
            }
        }

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries
                .par_iter()
                .map(|path| self.process_file(path, output_dir, opts))
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries
                .iter()
                .map(|path| self.process_file(path, output_dir, opts))
                .collect()
        }
    }
}

/// Check if a file has a recognized image extension (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "gif" | "bmp"
        ),
        None => false,
    }
}

/// Derive the output path for a watermarked image.
///
/// `"cat.png"` in `/out` becomes `/out/watermarked_cat.png`. The file name is
/// joined as-is: a name containing path separators escapes `output_dir`, so
/// callers feeding untrusted names must sanitize them first.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if either input is empty.
pub fn build_output_path(file_name: &str, output_dir: &Path) -> Result<PathBuf> {
    if file_name.is_empty() {
        return Err(Error::InvalidArgument(
            "file name cannot be empty".to_string(),
        ));
    }
    if output_dir.as_os_str().is_empty() {
        return Err(Error::InvalidArgument(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(output_dir.join(format!("{OUTPUT_PREFIX}{file_name}")))
}

/// Save an RGB image, inferring the container format from the extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let dyn_img = DynamicImage::ImageRgb8(img.clone());

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 95);
            encoder.encode_image(&dyn_img)?;
        }
        ImageFormat::Png | ImageFormat::Gif | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn build_output_path_prefixes_file_name() {
        let p = build_output_path("cat.png", Path::new("/out")).unwrap();
        assert_eq!(p, PathBuf::from("/out/watermarked_cat.png"));

        let p = build_output_path("c.JPG", Path::new("out/images")).unwrap();
        assert_eq!(p, PathBuf::from("out/images/watermarked_c.JPG"));
    }

    #[test]
    fn build_output_path_rejects_empty_inputs() {
        assert!(matches!(
            build_output_path("", Path::new("/out")),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            build_output_path("cat.png", Path::new("")),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn is_supported_image_accepts_known_extensions() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.GIF")));
        assert!(is_supported_image(Path::new("photo.bmp")));
    }

    #[test]
    fn is_supported_image_rejects_everything_else() {
        assert!(!is_supported_image(Path::new("photo.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("photo")));
        assert!(!is_supported_image(Path::new(".png")));
    }

    #[test]
    fn apply_scales_watermark_against_base_dimensions() {
        let wm = Watermarker::from_image(RgbImage::from_pixel(40, 40, Rgb([0, 0, 0])));
        let mut base = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));

        wm.apply(&mut base, Position::TopLeft, 0.25).unwrap();

        // 200x100 base at 0.25 gives a 50x25 watermark region
        assert_eq!(*base.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*base.get_pixel(49, 24), Rgb([0, 0, 0]));
        assert_eq!(*base.get_pixel(50, 0), Rgb([255, 255, 255]));
        assert_eq!(*base.get_pixel(0, 25), Rgb([255, 255, 255]));
    }

    #[test]
    fn apply_rejects_non_positive_scale() {
        let wm = Watermarker::from_image(RgbImage::new(10, 10));
        let mut base = RgbImage::new(50, 50);

        assert!(matches!(
            wm.apply(&mut base, Position::Center, 0.0),
            Err(Error::InvalidScale(_))
        ));
        assert!(matches!(
            wm.apply(&mut base, Position::Center, -2.0),
            Err(Error::InvalidScale(_))
        ));
    }

    #[test]
    fn apply_with_white_watermark_changes_nothing() {
        let wm = Watermarker::from_image(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
        let mut base = RgbImage::from_pixel(20, 20, Rgb([30, 60, 90]));

        wm.apply(&mut base, Position::Center, 1.0).unwrap();

        assert!(base.pixels().all(|p| *p == Rgb([30, 60, 90])));
    }

    #[test]
    fn default_options_center_at_half_scale() {
        let opts = ProcessOptions::default();
        assert_eq!(opts.position, Position::Center);
        assert!((opts.scale_factor - 0.5).abs() < f64::EPSILON);
    }
}
