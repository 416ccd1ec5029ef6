//! Pattern matcher: decide whether a candidate screenshot matches its baseline.
//!
//! Matching compares masked content hashes only. The diff engine runs lazily,
//! on a mismatch or when a diff is requested explicitly.

use image::RgbaImage;

use crate::baseline::BaselineRecord;
use crate::diff::DiffEngine;
use crate::error::{CompareError, Result};
use crate::hash::hash_image;
use crate::hierarchy::{BlindRegionHierarchy, PatternId};
use crate::mask::mask;
use crate::raster::{decode, encode_png};
use crate::types::{ComparisonResult, RegionSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    engine: DiffEngine,
}

impl Matcher {
    pub fn new(engine: DiffEngine) -> Self {
        Self { engine }
    }

    /// Compare `candidate` against `baseline` masked with `regions`.
    ///
    /// Fails with [`CompareError::StaleBaseline`] when the baseline hash was
    /// computed with a different region set.
    pub fn matches(
        &self,
        candidate: &[u8],
        baseline: &BaselineRecord,
        regions: &RegionSet,
    ) -> Result<ComparisonResult> {
        let candidate = decode(candidate)?;
        if self.hash_matches(&candidate, baseline, regions)? {
            tracing::debug!(regions = regions.len(), "candidate matches baseline");
            return Ok(ComparisonResult::matched());
        }

        tracing::debug!(
            expected = %baseline.content_hash(),
            "candidate hash differs from baseline, rendering diff"
        );
        let mut result = self.render_diff(&candidate, baseline, regions)?;
        result.is_match = false;
        Ok(result)
    }

    /// Like [`Matcher::matches`], but always renders the diff image.
    pub fn diff_against(
        &self,
        candidate: &[u8],
        baseline: &BaselineRecord,
        regions: &RegionSet,
    ) -> Result<ComparisonResult> {
        let candidate = decode(candidate)?;
        let is_match = self.hash_matches(&candidate, baseline, regions)?;
        let mut result = self.render_diff(&candidate, baseline, regions)?;
        result.is_match = is_match;
        Ok(result)
    }

    /// Resolve the pattern's regions from `hierarchy` and match against its
    /// baseline.
    pub fn compare_pattern(
        &self,
        hierarchy: &BlindRegionHierarchy,
        pattern: PatternId,
        candidate: &[u8],
    ) -> Result<ComparisonResult> {
        let context = hierarchy.context_for(pattern)?;
        let regions = hierarchy.resolve(&context)?;
        let baseline = hierarchy
            .pattern(pattern)
            .ok_or_else(|| CompareError::unresolved(format!("{pattern} not found")))?
            .baseline();
        self.matches(candidate, baseline, &regions)
    }

    fn hash_matches(
        &self,
        candidate: &RgbaImage,
        baseline: &BaselineRecord,
        regions: &RegionSet,
    ) -> Result<bool> {
        let regions = regions.to_vec();
        if !baseline.is_current_for(&regions) {
            return Err(CompareError::StaleBaseline(format!(
                "baseline hash was computed with {} blind regions that differ from the {} resolved now",
                baseline.regions_used_for_hash().len(),
                regions.len()
            )));
        }
        let masked = mask(candidate, &regions);
        Ok(&hash_image(&masked) == baseline.content_hash())
    }

    fn render_diff(
        &self,
        candidate: &RgbaImage,
        baseline: &BaselineRecord,
        regions: &RegionSet,
    ) -> Result<ComparisonResult> {
        let baseline_img = decode(baseline.image_bytes())?;
        let output = self.engine.diff(&baseline_img, candidate, &regions.global());
        Ok(ComparisonResult {
            is_match: false,
            diff_image: Some(encode_png(&output.image)?),
            bounding_rectangles: output.rectangles,
        })
    }
}

/// [`Matcher::matches`] with the default overlay style.
pub fn matches(
    candidate: &[u8],
    baseline: &BaselineRecord,
    regions: &RegionSet,
) -> Result<ComparisonResult> {
    Matcher::default().matches(candidate, baseline, regions)
}
