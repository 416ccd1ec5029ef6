//! Diff annotation: semi-transparent outlines around changed areas.

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::raster::blend_pixel;
use crate::types::Rect;

/// How changed areas are outlined on the diff image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStyle {
    pub color: [u8; 3],
    pub alpha: u8,
    /// Outline thickness in pixels, drawn inward from the rectangle edge
    pub stroke: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            alpha: 128,
            stroke: 1,
        }
    }
}

impl OverlayStyle {
    pub fn pixel(&self) -> Rgba<u8> {
        let [r, g, b] = self.color;
        Rgba([r, g, b, self.alpha])
    }
}

/// Blend outlines of `rects` onto `img`. Each covered pixel is blended once,
/// even where outlines cross.
pub fn draw_outlines(img: &mut RgbaImage, rects: &[Rect], style: &OverlayStyle) {
    let (width, height) = img.dimensions();
    let mut outline = GrayImage::new(width, height);
    for rect in rects {
        mark_outline(&mut outline, *rect, style.stroke.max(1));
    }

    let pen = style.pixel();
    for (x, y, marked) in outline.enumerate_pixels() {
        if marked.0[0] != 0 {
            blend_pixel(img, x, y, pen);
        }
    }
}

fn mark_outline(outline: &mut GrayImage, rect: Rect, stroke: u32) {
    let Some(area) = rect.clip(outline.width(), outline.height()) else {
        return;
    };
    // A stroke wider than the rectangle already fills it.
    let stroke = stroke.min(area.width.max(area.height));
    let x_end = area.left + area.width;
    let y_end = area.top + area.height;
    for y in area.top..y_end {
        for x in area.left..x_end {
            let on_edge = x < area.left.saturating_add(stroke)
                || x.saturating_add(stroke) >= x_end
                || y < area.top.saturating_add(stroke)
                || y.saturating_add(stroke) >= y_end;
            if on_edge {
                outline.put_pixel(x, y, Luma([255]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn outline_touches_only_edges() {
        let mut img = RgbaImage::from_pixel(20, 20, WHITE);
        draw_outlines(&mut img, &[Rect::new(5, 5, 6, 6)], &OverlayStyle::default());

        assert_ne!(*img.get_pixel(5, 5), WHITE);
        assert_ne!(*img.get_pixel(10, 7), WHITE);
        assert_ne!(*img.get_pixel(7, 10), WHITE);
        assert_eq!(*img.get_pixel(7, 7), WHITE);
        assert_eq!(*img.get_pixel(11, 11), WHITE);
        assert_eq!(*img.get_pixel(4, 5), WHITE);
    }

    #[test]
    fn crossing_outlines_blend_once() {
        let mut single = RgbaImage::from_pixel(20, 20, WHITE);
        draw_outlines(&mut single, &[Rect::new(2, 2, 10, 10)], &OverlayStyle::default());

        let mut crossed = RgbaImage::from_pixel(20, 20, WHITE);
        draw_outlines(
            &mut crossed,
            &[Rect::new(2, 2, 10, 10), Rect::new(2, 2, 4, 4)],
            &OverlayStyle::default(),
        );
        assert_eq!(single.get_pixel(2, 2), crossed.get_pixel(2, 2));
    }

    #[test]
    fn thick_stroke_fills_small_rect() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        let style = OverlayStyle {
            stroke: 3,
            ..OverlayStyle::default()
        };
        draw_outlines(&mut img, &[Rect::new(0, 0, 4, 4)], &style);
        assert!((0..4).all(|x| (0..4).all(|y| *img.get_pixel(x, y) != WHITE)));
    }

    #[test]
    fn huge_stroke_fills_rect_without_overflow() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        let style = OverlayStyle {
            stroke: u32::MAX,
            ..OverlayStyle::default()
        };
        draw_outlines(&mut img, &[Rect::new(2, 2, 5, 5)], &style);
        assert!((2..7).all(|x| (2..7).all(|y| *img.get_pixel(x, y) != WHITE)));
        assert_eq!(*img.get_pixel(7, 7), WHITE);
        assert_eq!(img.get_pixel(4, 4).0[3], 255);
    }

    #[test]
    fn outline_is_clipped_to_image() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        draw_outlines(&mut img, &[Rect::new(8, 8, 10, 10)], &OverlayStyle::default());
        assert_ne!(*img.get_pixel(8, 9), WHITE);
        assert_ne!(*img.get_pixel(9, 9), WHITE);
    }
}
