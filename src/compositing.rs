//! Mask construction and masked pasting.
//!
//! The watermark is blended via forward alpha blending:
//! `out = alpha * watermark + (1 - alpha) * base`
//!
//! where alpha comes from a luminance mask: the watermark is converted to
//! grayscale and inverted, so darker watermark pixels paste more opaquely and
//! white regions vanish entirely.

use image::imageops;
use image::{GrayImage, RgbImage};

/// Build the paste mask for a (resized) watermark.
///
/// Grayscale followed by inversion: a black logo on a white background
/// becomes a white-on-black stencil, so only the logo itself is pasted.
#[must_use]
pub fn luminance_mask(watermark: &RgbImage) -> GrayImage {
    let mut mask = imageops::grayscale(watermark);
    imageops::invert(&mut mask);
    mask
}

/// Paste `overlay` onto `base` at `(pos_x, pos_y)`, modulated per pixel by `mask`.
///
/// Mask values scale linearly: 255 replaces the base pixel with the overlay
/// pixel, 0 leaves it untouched. The overlay is clipped to the base image
/// bounds, so negative offsets and oversized overlays are safe.
///
/// # Panics
///
/// Panics if `mask` and `overlay` dimensions differ.
pub fn paste_with_mask(
    base: &mut RgbImage,
    overlay: &RgbImage,
    mask: &GrayImage,
    pos_x: i64,
    pos_y: i64,
) {
    assert_eq!(
        overlay.dimensions(),
        mask.dimensions(),
        "mask must match overlay dimensions"
    );

    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    let (overlay_w, overlay_h) = (i64::from(overlay.width()), i64::from(overlay.height()));

    // Clip to base image bounds
    let x0 = pos_x.max(0);
    let y0 = pos_y.max(0);
    let x1 = (pos_x + overlay_w).min(base_w);
    let y1 = (pos_y + overlay_h).min(base_h);

    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (src_x, src_y) = ((x - pos_x) as u32, (y - pos_y) as u32);

            let alpha = f32::from(mask.get_pixel(src_x, src_y)[0]) / 255.0;
            if alpha <= 0.0 {
                continue;
            }

            let overlay_px = *overlay.get_pixel(src_x, src_y);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let px = base.get_pixel_mut(x as u32, y as u32);
            for ch in 0..3 {
                let blended =
                    alpha * f32::from(overlay_px[ch]) + (1.0 - alpha) * f32::from(px[ch]);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(rgb))
    }

    #[test]
    fn mask_of_black_watermark_is_fully_opaque() {
        let mask = luminance_mask(&solid(4, 4, [0, 0, 0]));
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn mask_of_white_watermark_is_fully_transparent() {
        let mask = luminance_mask(&solid(4, 4, [255, 255, 255]));
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn full_mask_replaces_base_pixels() {
        let mut base = solid(10, 10, [255, 255, 255]);
        let overlay = solid(4, 4, [10, 20, 30]);
        let mask = GrayImage::from_pixel(4, 4, Luma([255]));

        paste_with_mask(&mut base, &overlay, &mask, 2, 3);

        assert_eq!(*base.get_pixel(2, 3), Rgb([10, 20, 30]));
        assert_eq!(*base.get_pixel(5, 6), Rgb([10, 20, 30]));
        assert_eq!(*base.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*base.get_pixel(6, 7), Rgb([255, 255, 255]));
    }

    #[test]
    fn zero_mask_leaves_base_untouched() {
        let mut base = solid(10, 10, [200, 200, 200]);
        let overlay = solid(10, 10, [0, 0, 0]);
        let mask = GrayImage::from_pixel(10, 10, Luma([0]));

        paste_with_mask(&mut base, &overlay, &mask, 0, 0);

        assert!(base.pixels().all(|p| *p == Rgb([200, 200, 200])));
    }

    #[test]
    fn half_mask_blends_midway() {
        let mut base = solid(2, 2, [0, 0, 0]);
        let overlay = solid(2, 2, [255, 255, 255]);
        let mask = GrayImage::from_pixel(2, 2, Luma([128]));

        paste_with_mask(&mut base, &overlay, &mask, 0, 0);

        let px = base.get_pixel(0, 0);
        for ch in 0..3 {
            assert!((i32::from(px[ch]) - 128).abs() <= 1, "channel {ch}: {}", px[ch]);
        }
    }

    #[test]
    fn negative_offset_clips_instead_of_panicking() {
        let mut base = solid(10, 10, [255, 255, 255]);
        let overlay = solid(6, 6, [0, 0, 0]);
        let mask = GrayImage::from_pixel(6, 6, Luma([255]));

        paste_with_mask(&mut base, &overlay, &mask, -3, -3);

        // Only the overlapping 3x3 corner is painted
        assert_eq!(*base.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*base.get_pixel(2, 2), Rgb([0, 0, 0]));
        assert_eq!(*base.get_pixel(3, 3), Rgb([255, 255, 255]));
    }

    #[test]
    fn oversized_overlay_clips_to_base() {
        let mut base = solid(4, 4, [255, 255, 255]);
        let overlay = solid(20, 20, [0, 0, 0]);
        let mask = GrayImage::from_pixel(20, 20, Luma([255]));

        paste_with_mask(&mut base, &overlay, &mask, 0, 0);

        assert!(base.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn fully_disjoint_overlay_is_a_no_op() {
        let mut base = solid(4, 4, [9, 9, 9]);
        let overlay = solid(2, 2, [0, 0, 0]);
        let mask = GrayImage::from_pixel(2, 2, Luma([255]));

        paste_with_mask(&mut base, &overlay, &mask, 100, 100);
        paste_with_mask(&mut base, &overlay, &mask, -50, -50);

        assert!(base.pixels().all(|p| *p == Rgb([9, 9, 9])));
    }

    #[test]
    fn empty_overlay_is_a_no_op() {
        let mut base = solid(4, 4, [9, 9, 9]);
        let overlay = RgbImage::new(0, 0);
        let mask = GrayImage::new(0, 0);

        paste_with_mask(&mut base, &overlay, &mask, 0, 0);

        assert!(base.pixels().all(|p| *p == Rgb([9, 9, 9])));
    }
}
