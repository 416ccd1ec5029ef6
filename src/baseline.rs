//! Approved baseline screenshots and their masked content hash.

use crate::error::Result;
use crate::hash::{masked_hash, ContentHash};
use crate::types::BlindRegion;

/// An approved screenshot together with `hash(mask(image, regions))`.
///
/// The hash and the regions it was computed with only change together,
/// through [`BaselineRecord::recompute_hash`] or
/// [`BaselineRecord::replace_image`]. A failed comparison never touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineRecord {
    image_bytes: Vec<u8>,
    content_hash: ContentHash,
    regions_used_for_hash: Vec<BlindRegion>,
}

impl BaselineRecord {
    /// Approve `image_bytes` as a baseline masked with `regions`.
    pub fn new(image_bytes: Vec<u8>, regions: Vec<BlindRegion>) -> Result<Self> {
        let content_hash = masked_hash(&image_bytes, &regions)?;
        Ok(Self {
            image_bytes,
            content_hash,
            regions_used_for_hash: regions,
        })
    }

    /// Rebuild a record loaded from storage without re-hashing.
    ///
    /// The caller vouches that `content_hash` was computed from `image_bytes`
    /// masked with `regions_used_for_hash`.
    pub fn from_parts(
        image_bytes: Vec<u8>,
        content_hash: ContentHash,
        regions_used_for_hash: Vec<BlindRegion>,
    ) -> Self {
        Self {
            image_bytes,
            content_hash,
            regions_used_for_hash,
        }
    }

    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn regions_used_for_hash(&self) -> &[BlindRegion] {
        &self.regions_used_for_hash
    }

    /// Whether the stored hash was computed with the same set of `regions`.
    ///
    /// Order and repeats are ignored since masking does not depend on them.
    pub fn is_current_for(&self, regions: &[BlindRegion]) -> bool {
        canonical(&self.regions_used_for_hash) == canonical(regions)
    }

    /// Re-mask the baseline with `regions` and store the new hash.
    ///
    /// On error the record is left unchanged.
    pub fn recompute_hash(&mut self, regions: Vec<BlindRegion>) -> Result<()> {
        let content_hash = masked_hash(&self.image_bytes, &regions)?;
        tracing::debug!(
            regions = regions.len(),
            hash = %content_hash,
            "recomputed baseline hash"
        );
        self.content_hash = content_hash;
        self.regions_used_for_hash = regions;
        Ok(())
    }

    /// Approve a new screenshot, keeping the current regions.
    pub fn replace_image(&mut self, image_bytes: Vec<u8>) -> Result<()> {
        let content_hash = masked_hash(&image_bytes, &self.regions_used_for_hash)?;
        self.image_bytes = image_bytes;
        self.content_hash = content_hash;
        Ok(())
    }
}

fn canonical(regions: &[BlindRegion]) -> Vec<BlindRegion> {
    let mut sorted = regions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
