//! Pixel-buffer helpers shared by masking, hashing and diffing.
//!
//! Every engine stage works on [`RgbaImage`]: row-major RGBA, 8 bits per
//! channel, stride `width * 4`.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageBuffer, ImageEncoder, Pixel, Rgba, RgbaImage};

use crate::error::{CompareError, Result};
use crate::types::Rect;

/// Decode encoded image bytes (any enabled container format) into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(CompareError::InvalidImageData)?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA8 buffer as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|e| CompareError::Encode(format!("Failed to encode PNG: {e}")))?;
    Ok(buf.into_inner())
}

/// Read an image file from disk without decoding it.
pub fn read_image_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CompareError::Config(format!(
            "File not found: {}",
            path.display()
        )));
    }
    Ok(std::fs::read(path)?)
}

/// Paint `pixel` over `rect`, clipped to the buffer bounds.
pub fn fill_rect<P: Pixel>(img: &mut ImageBuffer<P, Vec<P::Subpixel>>, rect: Rect, pixel: P) {
    let Some(area) = rect.clip(img.width(), img.height()) else {
        return;
    };
    for y in area.top..area.top + area.height {
        for x in area.left..area.left + area.width {
            img.put_pixel(x, y, pixel);
        }
    }
}

/// Composite `pixel` over the existing pixel at `(x, y)` ("over" operator),
/// ignoring coordinates outside the buffer. An opaque destination stays opaque.
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, pixel: Rgba<u8>) {
    if x >= img.width() || y >= img.height() {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    let src_a = u32::from(pixel[3]);
    let dst_a = u32::from(dst[3]);
    // Alphas scaled by 255: out = src + dst * (1 - src)
    let dst_w = dst_a * (255 - src_a);
    let out_a = src_a * 255 + dst_w;
    if out_a == 0 {
        return;
    }
    for c in 0..3 {
        let num = u32::from(pixel[c]) * src_a * 255 + u32::from(dst[c]) * dst_w;
        dst[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
