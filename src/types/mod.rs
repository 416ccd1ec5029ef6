//! Value types shared by the comparison engine.

mod comparison;
mod geometry;
mod regions;

pub use comparison::ComparisonResult;
pub use geometry::{BlindRegion, Rect};
pub use regions::{RegionLayers, RegionScope, RegionSet, ScopedRegion};
