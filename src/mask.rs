//! Masking transform: paint blind regions opaque on a copy of an image.
//!
//! Both the hashing path and the diff path go through [`paint_regions`], so a
//! masked pixel can never surface as a difference.

use image::{ImageBuffer, Pixel, Rgba, RgbaImage};

use crate::error::Result;
use crate::raster::{decode, fill_rect};
use crate::types::BlindRegion;

/// Fill color for masked areas.
pub const MASK_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Return a copy of `image` with every region painted [`MASK_COLOR`].
///
/// Regions extending beyond the image are clipped. An empty region list
/// yields an unchanged copy.
pub fn mask<'a>(image: &RgbaImage, regions: impl IntoIterator<Item = &'a BlindRegion>) -> RgbaImage {
    let mut masked = image.clone();
    paint_regions(&mut masked, regions, MASK_COLOR);
    masked
}

/// Decode `bytes` and mask the result.
pub fn mask_bytes<'a>(
    bytes: &[u8],
    regions: impl IntoIterator<Item = &'a BlindRegion>,
) -> Result<RgbaImage> {
    let mut img = decode(bytes)?;
    paint_regions(&mut img, regions, MASK_COLOR);
    Ok(img)
}

pub(crate) fn paint_regions<'a, P: Pixel>(
    img: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    regions: impl IntoIterator<Item = &'a BlindRegion>,
    fill: P,
) {
    for region in regions {
        fill_rect(img, region.rect(), fill);
    }
}
