//! Raw XOR rendering of two screenshots.

use image::{Rgba, RgbaImage};

use crate::mask::{paint_regions, MASK_COLOR};
use crate::types::BlindRegion;
use crate::unify::unify;

/// Per-channel XOR of the unified images, alpha taken from `b`, with blind
/// regions painted black. Identical pixels come out black.
pub fn xor_image(a: &RgbaImage, b: &RgbaImage, regions: &[BlindRegion]) -> RgbaImage {
    let (a, b) = unify(a, b);
    let mut result = b.into_owned();

    for (out, pa) in result.pixels_mut().zip(a.pixels()) {
        let pb = *out;
        *out = Rgba([
            pa.0[0] ^ pb.0[0],
            pa.0[1] ^ pb.0[1],
            pa.0[2] ^ pb.0[2],
            pb.0[3],
        ]);
    }

    paint_regions(&mut result, regions, MASK_COLOR);
    result
}
