//! Connected-component extraction over a changed-pixel map.
//!
//! Two-pass labelling with union-find (8-connectivity), then per-component
//! bounding rectangles, minimum-size filtering and nested-box removal.

use image::GrayImage;

use super::changes::is_changed;
use crate::types::Rect;

/// Minimum bounding-box size a component needs to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinComponentSize {
    pub width: u32,
    pub height: u32,
}

/// First-tier filter: drops specks left over after dilation.
pub const PRIMARY_MIN_SIZE: MinComponentSize = MinComponentSize {
    width: 5,
    height: 5,
};

/// Second-tier filter, used only when nothing survives the first tier.
pub const FALLBACK_MIN_SIZE: MinComponentSize = MinComponentSize {
    width: 1,
    height: 1,
};

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Bounds {
    fn new(x: u32, y: u32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    fn to_rect(self) -> Rect {
        Rect::from_corners(self.x0, self.y0, self.x1, self.y1)
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Label 0 is background.
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut current = label;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        root
    }

    /// Roots always end up as the smaller label, so root order follows the
    /// raster position of each component's first pixel.
    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[high as usize] = low;
    }
}

/// Bounding rectangle of every 8-connected component, ordered by the raster
/// position of the component's first pixel.
pub fn component_bounds(map: &GrayImage) -> Vec<Rect> {
    let (width, height) = map.dimensions();
    let mut labels = vec![0u32; width as usize * height as usize];
    let mut uf = UnionFind::new();
    let idx = |x: u32, y: u32| y as usize * width as usize + x as usize;

    for y in 0..height {
        for x in 0..width {
            if !is_changed(map, x, y) {
                continue;
            }

            let mut neighbours = [0u32; 4];
            if x > 0 {
                neighbours[0] = labels[idx(x - 1, y)];
            }
            if y > 0 {
                neighbours[1] = labels[idx(x, y - 1)];
                if x > 0 {
                    neighbours[2] = labels[idx(x - 1, y - 1)];
                }
                if x + 1 < width {
                    neighbours[3] = labels[idx(x + 1, y - 1)];
                }
            }

            let label = match neighbours.iter().copied().filter(|&l| l != 0).min() {
                Some(min) => {
                    for &other in neighbours.iter().filter(|&&l| l != 0 && l != min) {
                        uf.union(min, other);
                    }
                    min
                }
                None => uf.make(),
            };
            labels[idx(x, y)] = label;
        }
    }

    let mut bounds: Vec<Option<Bounds>> = vec![None; uf.parent.len()];
    for y in 0..height {
        for x in 0..width {
            let label = labels[idx(x, y)];
            if label == 0 {
                continue;
            }
            let root = uf.find(label) as usize;
            bounds[root].get_or_insert(Bounds::new(x, y)).add(x, y);
        }
    }

    // Only roots hold bounds, and roots are ordered by first pixel.
    bounds.into_iter().flatten().map(Bounds::to_rect).collect()
}

pub fn filter_min_size(rects: &[Rect], min: MinComponentSize) -> Vec<Rect> {
    rects
        .iter()
        .copied()
        .filter(|r| r.width >= min.width && r.height >= min.height)
        .collect()
}

/// Drop every rectangle fully contained in another one. Identical rectangles
/// collapse to their first occurrence.
pub fn remove_nested(rects: Vec<Rect>) -> Vec<Rect> {
    rects
        .iter()
        .enumerate()
        .filter(|(i, rect)| {
            !rects.iter().enumerate().any(|(j, other)| {
                j != *i && rect.is_inside(other) && (*rect != other || j < *i)
            })
        })
        .map(|(_, rect)| *rect)
        .collect()
}

/// Component rectangles with the two-tier size filter and nested-box removal.
pub fn bounding_rectangles(map: &GrayImage) -> Vec<Rect> {
    let all = component_bounds(map);
    let mut kept = filter_min_size(&all, PRIMARY_MIN_SIZE);
    if kept.is_empty() && !all.is_empty() {
        tracing::debug!(
            components = all.len(),
            "no component reached 5x5, falling back to 1x1 minimum"
        );
        kept = filter_min_size(&all, FALLBACK_MIN_SIZE);
    }
    remove_nested(kept)
}
