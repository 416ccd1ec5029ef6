//! Changed-pixel maps: thresholded difference and binary dilation.

use image::{GrayImage, Luma, RgbaImage};

pub(crate) const CHANGED: Luma<u8> = Luma([255]);
pub(crate) const UNCHANGED: Luma<u8> = Luma([0]);

pub(crate) fn is_changed(map: &GrayImage, x: u32, y: u32) -> bool {
    map.get_pixel(x, y).0[0] != 0
}

/// Mark every pixel whose RGB channels differ between `a` and `b`.
///
/// Both images must share dimensions (see [`crate::unify::unify`]). Alpha is
/// not compared.
pub fn changed_pixels(a: &RgbaImage, b: &RgbaImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let (width, height) = a.dimensions();
    let mut map = GrayImage::new(width, height);

    for ((pa, pb), out) in a.pixels().zip(b.pixels()).zip(map.pixels_mut()) {
        let xor = (pa.0[0] ^ pb.0[0]) | (pa.0[1] ^ pb.0[1]) | (pa.0[2] ^ pb.0[2]);
        if xor != 0 {
            *out = CHANGED;
        }
    }
    map
}

/// 3x3 binary dilation: a pixel is changed if it or any of its eight
/// neighbours was changed.
pub fn dilate_3x3(map: &GrayImage) -> GrayImage {
    let (width, height) = map.dimensions();

    // Separable max filter: horizontal then vertical.
    let mut horizontal = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(width - 1);
            if (x0..=x1).any(|nx| is_changed(map, nx, y)) {
                horizontal.put_pixel(x, y, CHANGED);
            }
        }
    }

    let mut result = GrayImage::new(width, height);
    for y in 0..height {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(height - 1);
        for x in 0..width {
            if (y0..=y1).any(|ny| is_changed(&horizontal, x, ny)) {
                result.put_pixel(x, y, CHANGED);
            }
        }
    }
    result
}
