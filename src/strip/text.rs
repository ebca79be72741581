/**
 * ============================================================================
 * STRIP TEXT MODULE
 * ============================================================================
 *
 * PURPOSE: Text stamping for strip headers, footers and shot indices
 *
 * Fonts are bundled so composition works without any system font lookup.
 * Baselines follow the canvas-style coordinates of the layout; glyph tops
 * are derived from the pixel size when drawing.
 *
 * ============================================================================
 */

use ab_glyph::FontRef;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use once_cell::sync::Lazy;

static HEADING_FONT: Lazy<FontRef<'static>> = Lazy::new(|| {
    FontRef::try_from_slice(include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf"))
        .expect("bundled heading font parses")
});

static BODY_FONT: Lazy<FontRef<'static>> = Lazy::new(|| {
    FontRef::try_from_slice(include_bytes!("../../assets/fonts/DejaVuSans.ttf"))
        .expect("bundled body font parses")
});

pub fn heading_font() -> &'static FontRef<'static> {
    &HEADING_FONT
}

pub fn body_font() -> &'static FontRef<'static> {
    &BODY_FONT
}

// Draw `text` horizontally centered with its baseline at `baseline_y`
pub fn draw_centered(
    canvas: &mut RgbaImage,
    font: &FontRef<'static>,
    text: &str,
    px: f32,
    baseline_y: u32,
    color: Rgba<u8>,
) {
    let (text_w, _) = text_size(px, font, text);
    let x = (canvas.width() as i32 - text_w as i32) / 2;
    let y = baseline_y as i32 - px.round() as i32;
    draw_text_mut(canvas, color, x, y.max(0), px, font, text);
}

// Stamp short text at a fixed top-left position, with a 1px offset shadow
// so it stays readable over photo content
pub fn stamp(canvas: &mut RgbaImage, text: &str, px: f32, x: i32, y: i32, color: Rgba<u8>) {
    let shadow = Rgba([0, 0, 0, 180]);
    draw_text_mut(canvas, shadow, x + 1, y + 1, px, body_font(), text);
    draw_text_mut(canvas, color, x, y, px, body_font(), text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_fonts_parse() {
        let _ = heading_font();
        let _ = body_font();
    }

    #[test]
    fn test_draw_centered_marks_pixels() {
        let mut canvas = RgbaImage::from_pixel(200, 60, Rgba([255, 255, 255, 255]));
        draw_centered(
            &mut canvas,
            heading_font(),
            "TEST",
            28.0,
            40,
            Rgba([0, 0, 0, 255]),
        );
        let touched = canvas
            .pixels()
            .any(|p| *p != Rgba([255, 255, 255, 255]));
        assert!(touched);
    }

    #[test]
    fn test_stamp_marks_pixels() {
        let mut canvas = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        stamp(&mut canvas, "1", 16.0, 6, 6, Rgba([255, 255, 255, 255]));
        // The shadow alone must mark something even with white text on white
        let touched = canvas
            .pixels()
            .any(|p| *p != Rgba([255, 255, 255, 255]));
        assert!(touched);
    }
}
