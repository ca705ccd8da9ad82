//! Alpha compositing of the annotation overlay onto the snip
//!
//! Standard "over" with a premultiplied source on an opaque destination:
//! `out = src + dst * (255 - src_alpha) / 255`. A fully transparent overlay
//! pixel leaves the base pixel untouched.

use image::{Rgb, RgbImage};

use super::image::OverlayBuffer;

/// Flatten `overlay` over `base`. Pure; the same inputs always give the same pixels.
pub fn composite(base: &RgbImage, overlay: &OverlayBuffer) -> RgbImage {
    debug_assert_eq!(
        base.dimensions(),
        (overlay.width(), overlay.height()),
        "overlay must match the snip"
    );

    let mut out = base.clone();
    let width = base.width().min(overlay.width());
    let height = base.height().min(overlay.height());
    let stride = overlay.width() as usize;
    let src_pixels = overlay.pixmap().pixels();

    for y in 0..height {
        for x in 0..width {
            let src = src_pixels[y as usize * stride + x as usize];
            let alpha = src.alpha();
            if alpha == 0 {
                continue;
            }
            let inv = 255 - u32::from(alpha);
            let Rgb([r, g, b]) = *out.get_pixel(x, y);
            out.put_pixel(
                x,
                y,
                Rgb([
                    over(src.red(), r, inv),
                    over(src.green(), g, inv),
                    over(src.blue(), b, inv),
                ]),
            );
        }
    }
    out
}

#[inline]
fn over(src_premul: u8, dst: u8, inv_alpha: u32) -> u8 {
    let blended = u32::from(src_premul) + (u32::from(dst) * inv_alpha + 127) / 255;
    blended.min(255) as u8
}
