//! Result types produced by the pattern matcher.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Outcome of comparing a candidate screenshot against a baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Masked candidate hash equals the baseline hash
    pub is_match: bool,
    /// PNG-encoded annotated diff (mismatch or explicit request only)
    #[serde(default, skip_serializing)]
    pub diff_image: Option<Vec<u8>>,
    /// Changed areas outside global blind regions, in detection order
    #[serde(default)]
    pub bounding_rectangles: Vec<Rect>,
}

impl ComparisonResult {
    pub fn matched() -> Self {
        Self {
            is_match: true,
            diff_image: None,
            bounding_rectangles: Vec::new(),
        }
    }
}
