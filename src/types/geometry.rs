//! Geometry types used throughout the blindcmp library.
//!
//! This module contains the fundamental value types:
//! - [`Rect`] - Axis-aligned pixel rectangle (diff output, clipping)
//! - [`BlindRegion`] - Validated rectangle excluded from comparison

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// Axis-aligned rectangle in image pixel coordinates.
///
/// `left`/`top` are inclusive, `right()`/`bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a rectangle from inclusive corner coordinates.
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            width: x0.abs_diff(x1) + 1,
            height: y0.abs_diff(y1) + 1,
        }
    }

    pub fn right(&self) -> u64 {
        self.left as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.top as u64 + self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// All four edges of `self` lie within the edges of `container`.
    pub fn is_inside(&self, container: &Rect) -> bool {
        self.left >= container.left
            && self.top >= container.top
            && self.right() <= container.right()
            && self.bottom() <= container.bottom()
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.left && y >= self.top && (x as u64) < self.right() && (y as u64) < self.bottom()
    }

    /// Intersection with a `width x height` canvas, `None` when nothing is left.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.left.min(width);
        let y0 = self.top.min(height);
        let x1 = self.right().min(width as u64) as u32;
        let y1 = self.bottom().min(height as u64) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// A rectangular area deliberately excluded from comparison.
///
/// Construction rejects negative coordinates and sizes, so every value in
/// circulation is valid. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion", into = "Rect")]
pub struct BlindRegion(Rect);

impl BlindRegion {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Result<Self> {
        let left = component("left", left)?;
        let top = component("top", top)?;
        let width = component("width", width)?;
        let height = component("height", height)?;
        Ok(Self(Rect::new(left, top, width, height)))
    }

    pub const fn from_rect(rect: Rect) -> Self {
        Self(rect)
    }

    pub fn left(&self) -> u32 {
        self.0.left
    }

    pub fn top(&self) -> u32 {
        self.0.top
    }

    pub fn width(&self) -> u32 {
        self.0.width
    }

    pub fn height(&self) -> u32 {
        self.0.height
    }

    pub fn rect(&self) -> Rect {
        self.0
    }
}

fn component(name: &str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(CompareError::invalid_region(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| {
        CompareError::invalid_region(format!("{name} {value} exceeds the pixel coordinate range"))
    })
}

impl From<BlindRegion> for Rect {
    fn from(region: BlindRegion) -> Self {
        region.0
    }
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    left: i64,
    top: i64,
    #[serde(alias = "w")]
    width: i64,
    #[serde(alias = "h")]
    height: i64,
}

impl TryFrom<RawRegion> for BlindRegion {
    type Error = CompareError;

    fn try_from(raw: RawRegion) -> Result<Self> {
        BlindRegion::new(raw.left, raw.top, raw.width, raw.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            BlindRegion::new(-1, 0, 10, 10),
            Err(CompareError::InvalidRegion(_))
        ));
        assert!(matches!(
            BlindRegion::new(0, 0, 10, -10),
            Err(CompareError::InvalidRegion(_))
        ));
    }

    #[test]
    fn oversized_values_are_rejected() {
        let err = BlindRegion::new(0, 0, u32::MAX as i64 + 1, 1).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn equality_is_structural() {
        let a = BlindRegion::new(1, 2, 3, 4).unwrap();
        let b = BlindRegion::from_rect(Rect::new(1, 2, 3, 4));
        assert_eq!(a, b);
    }

    #[test]
    fn deserialization_validates() {
        let ok: BlindRegion =
            serde_json::from_str(r#"{"left":5,"top":6,"w":7,"h":8}"#).expect("valid region");
        assert_eq!(ok.rect(), Rect::new(5, 6, 7, 8));

        let bad = serde_json::from_str::<BlindRegion>(r#"{"left":-5,"top":6,"width":7,"height":8}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn serializes_as_plain_rect() {
        let region = BlindRegion::new(40, 40, 30, 30).unwrap();
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(json, r#"{"left":40,"top":40,"width":30,"height":30}"#);
    }

    #[test]
    fn clip_trims_to_canvas() {
        let rect = Rect::new(90, 95, 20, 20);
        assert_eq!(rect.clip(100, 100), Some(Rect::new(90, 95, 10, 5)));
        assert_eq!(Rect::new(120, 0, 5, 5).clip(100, 100), None);
        assert_eq!(Rect::new(0, 0, 0, 5).clip(100, 100), None);
    }

    #[test]
    fn containment_checks_all_edges() {
        let outer = Rect::new(10, 10, 20, 20);
        assert!(Rect::new(10, 10, 20, 20).is_inside(&outer));
        assert!(Rect::new(12, 15, 3, 3).is_inside(&outer));
        assert!(!Rect::new(9, 15, 3, 3).is_inside(&outer));
        assert!(!Rect::new(25, 25, 6, 2).is_inside(&outer));
    }

    #[test]
    fn from_corners_is_inclusive() {
        assert_eq!(Rect::from_corners(49, 49, 60, 60), Rect::new(49, 49, 12, 12));
    }
}
