//! blindcmp library
//!
//! Screenshot comparison for visual regression testing. A candidate
//! screenshot matches its approved baseline when both hash identically after
//! masking the blind regions (areas with legitimately varying content such
//! as clocks or ads) collected from a three-level hierarchy. On a mismatch a
//! diff image is rendered with the changed areas outlined.
//!
//! # Module Overview
//!
//! - [`types`] - Rectangles, blind regions, region sets and results
//! - [`hierarchy`] - Global / category / pattern scopes and region resolution
//! - [`mask`] - Painting blind regions over a screenshot
//! - [`hash`] - Canonical content hash of decoded pixels
//! - [`unify`] - Padding two screenshots to a common canvas
//! - [`diff`] - Change detection, clustering and annotation
//! - [`matcher`] - Match decision against a [`BaselineRecord`]
//! - [`session`] - Duplicate screenshot guard
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use blindcmp_lib::{BaselineRecord, BlindRegion, RegionScope, RegionSet, Matcher};
//!
//! # fn example(baseline_png: Vec<u8>, candidate_png: &[u8]) -> blindcmp_lib::Result<()> {
//! let clock = BlindRegion::new(40, 40, 30, 30)?;
//! let regions = RegionSet::from_scope(RegionScope::Global, [clock]);
//! let baseline = BaselineRecord::new(baseline_png, regions.to_vec())?;
//!
//! let result = Matcher::default().matches(candidate_png, &baseline, &regions)?;
//! if !result.is_match {
//!     println!("{} changed areas", result.bounding_rectangles.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod baseline;
pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod hierarchy;
pub mod mask;
pub mod matcher;
pub mod output;
pub mod raster;
pub mod session;
pub mod types;
pub mod unify;

pub use baseline::BaselineRecord;
pub use config::Config;
pub use diff::{diff, xor_image, DiffEngine, DiffOutput, OverlayStyle};
pub use error::{CompareError, ErrorCategory, ErrorPayload, Result};
pub use hash::{hash, hash_image, masked_hash, ContentHash};
pub use hierarchy::{
    BlindRegionHierarchy, BrowserPattern, Category, CategoryId, HierarchyContext, NewPattern,
    PatternId,
};
pub use mask::{mask, mask_bytes, MASK_COLOR};
pub use matcher::{matches, Matcher};
pub use output::{
    BlindcmpOutput, DiffReport, ErrorOutput, HashOutput, MaskOutput, MatchOutput,
    BLINDCMP_OUTPUT_VERSION,
};
pub use session::{ScreenshotIdentity, ScreenshotSession};
pub use types::{
    BlindRegion, ComparisonResult, Rect, RegionLayers, RegionScope, RegionSet, ScopedRegion,
};
pub use unify::unify;
