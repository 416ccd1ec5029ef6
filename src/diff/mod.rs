//! Diff engine: locate and annotate what changed between two screenshots.
//!
//! Pipeline:
//! 1. Unify dimensions (top-left anchored canvas)
//! 2. Thresholded difference: any RGB change marks a pixel
//! 3. 3x3 dilation to merge neighbouring changes and anti-aliasing noise
//! 4. Clear global blind regions from the change map
//! 5. 8-connected components, at least 5x5 (falling back to 1x1 when empty)
//! 6. Bounding rectangle per component, nested rectangles removed
//! 7. Outline the rectangles on a copy of the second image

mod changes;
mod components;
mod overlay;
mod xor;

use image::RgbaImage;

use crate::error::Result;
use crate::mask::paint_regions;
use crate::raster::decode;
use crate::types::{BlindRegion, Rect};
use crate::unify::unify;

pub use changes::{changed_pixels, dilate_3x3};
pub use components::{
    bounding_rectangles, component_bounds, remove_nested, MinComponentSize, FALLBACK_MIN_SIZE,
    PRIMARY_MIN_SIZE,
};
pub use overlay::{draw_outlines, OverlayStyle};
pub use xor::xor_image;

/// Annotated diff image plus the rectangles drawn on it.
#[derive(Debug, Clone)]
pub struct DiffOutput {
    pub image: RgbaImage,
    pub rectangles: Vec<Rect>,
}

impl DiffOutput {
    pub fn has_differences(&self) -> bool {
        !self.rectangles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    pub overlay: OverlayStyle,
}

impl DiffEngine {
    pub fn new(overlay: OverlayStyle) -> Self {
        Self { overlay }
    }

    /// Compare `a` against `b`; the diff image is drawn on (unified) `b`.
    pub fn diff(&self, a: &RgbaImage, b: &RgbaImage, global_regions: &[BlindRegion]) -> DiffOutput {
        let (a, b) = unify(a, b);

        let changed = changed_pixels(&a, &b);
        let mut changed = dilate_3x3(&changed);
        paint_regions(&mut changed, global_regions, changes::UNCHANGED);

        let rectangles = bounding_rectangles(&changed);
        tracing::debug!(
            width = b.width(),
            height = b.height(),
            blind_regions = global_regions.len(),
            rectangles = rectangles.len(),
            "computed screenshot diff"
        );

        let mut image = b.into_owned();
        draw_outlines(&mut image, &rectangles, &self.overlay);
        DiffOutput { image, rectangles }
    }

    /// Decode both byte buffers and diff them.
    pub fn diff_bytes(
        &self,
        a: &[u8],
        b: &[u8],
        global_regions: &[BlindRegion],
    ) -> Result<DiffOutput> {
        let a = decode(a)?;
        let b = decode(b)?;
        Ok(self.diff(&a, &b, global_regions))
    }
}

/// [`DiffEngine::diff`] with the default overlay style.
pub fn diff(a: &RgbaImage, b: &RgbaImage, global_regions: &[BlindRegion]) -> DiffOutput {
    DiffEngine::default().diff(a, b, global_regions)
}
