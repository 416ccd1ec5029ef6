//! Dimension unifier: put two screenshots of different sizes on a common canvas.

use std::borrow::Cow;

use image::{imageops, RgbaImage};

/// Reconcile `a` and `b` onto identical dimensions.
///
/// Matching sizes are returned borrowed. Otherwise each image smaller than the
/// `(max width, max height)` canvas is copied onto a transparent canvas at
/// `(0, 0)`; an image already at canvas size is borrowed as-is.
pub fn unify<'a>(a: &'a RgbaImage, b: &'a RgbaImage) -> (Cow<'a, RgbaImage>, Cow<'a, RgbaImage>) {
    if a.dimensions() == b.dimensions() {
        return (Cow::Borrowed(a), Cow::Borrowed(b));
    }

    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    (
        redraw_on_canvas(a, width, height),
        redraw_on_canvas(b, width, height),
    )
}

fn redraw_on_canvas(img: &RgbaImage, width: u32, height: u32) -> Cow<'_, RgbaImage> {
    if img.dimensions() == (width, height) {
        return Cow::Borrowed(img);
    }
    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, img, 0, 0);
    Cow::Owned(canvas)
}
