//! Compositor: renders a layout plan onto a white canvas.
//!
//! The only module that rasterizes anything. The photo is blitted unscaled;
//! text is drawn with `imageproc` using the faces resolved in
//! [`FontLibrary`](crate::fonts::FontLibrary).

use ab_glyph::PxScale;
use image::{DynamicImage, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;

use crate::fonts::FontLibrary;
use crate::layout::LayoutPlan;

/// Dark gray used for all caption text.
pub const TEXT_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

const CANVAS_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composite one photo and its caption onto a fresh canvas.
///
/// The canvas is `(w + 2*side) x (h + top + bottom)`, the photo lands at
/// `(side, top)`, and each instruction is translated from photo-relative to
/// canvas coordinates. Pure pixel work — no I/O.
pub fn render(photo: &DynamicImage, plan: &LayoutPlan, fonts: &FontLibrary) -> RgbImage {
    let (w, h) = (photo.width(), photo.height());
    let (canvas_w, canvas_h) = plan.canvas_size(w, h);
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, CANVAS_WHITE);

    imageops::replace(
        &mut canvas,
        &photo.to_rgb8(),
        plan.side as i64,
        plan.top as i64,
    );

    let text_top = (plan.top + h) as i64;
    for instr in &plan.instructions {
        draw_text_mut(
            &mut canvas,
            TEXT_COLOR,
            (plan.side as i64 + instr.x) as i32,
            (text_top + instr.top_offset) as i32,
            PxScale::from(instr.size as f32),
            fonts.font(instr.role),
            &instr.text,
        );
    }
    canvas
}
