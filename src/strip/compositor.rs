/**
 * ============================================================================
 * STRIP COMPOSITOR MODULE
 * ============================================================================
 *
 * PURPOSE: Lay captured shots out on a single decorated strip raster
 *
 * compose() is pure: shots in, flattened RGBA strip out, no I/O. Every
 * per-image draw and the terminal footer are applied before it returns,
 * so the returned strip is final and exportable by construction.
 *
 * DRAW ORDER:
 * 1. Background fill (solid or vertical gradient)
 * 2. Tricolor bands at top and bottom
 * 3. Header, subheader and capture date
 * 4. Each shot: cover-placed into its cell, clipped, framed, index-stamped
 * 5. Footer caption lines below the last cell
 *
 * ============================================================================
 */

use chrono::{DateTime, Utc};
use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::booth::types::{CapturedImage, SHOT_COUNT};
use crate::strip::layout::{cover_placement, StripLayout};
use crate::strip::text;

// The final rendered strip. Produced once per completed session,
// replaced on reset.
#[derive(Debug, Clone)]
pub struct CompositedStrip {
    pixels: RgbaImage,
    composed_at: DateTime<Utc>,
}

impl CompositedStrip {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn composed_at(&self) -> DateTime<Utc> {
        self.composed_at
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("no shots to compose")]
    EmptySession,

    #[error("strip holds at most {SHOT_COUNT} shots, got {0}")]
    TooManyShots(usize),
}

// Compose `shots` onto a strip per `layout`. Shots are drawn in order;
// the 1-based index stamped in each cell comes from the shot itself.
pub fn compose(shots: &[CapturedImage], layout: &StripLayout) -> Result<CompositedStrip, CompositeError> {
    if shots.is_empty() {
        return Err(CompositeError::EmptySession);
    }
    if shots.len() > SHOT_COUNT {
        return Err(CompositeError::TooManyShots(shots.len()));
    }

    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, layout.background);

    if let Some(bottom) = layout.background_bottom {
        fill_vertical_gradient(&mut canvas, layout.background, bottom);
    }

    draw_bands(&mut canvas, layout);
    draw_header(&mut canvas, layout, shots[0].taken_at());

    let mut last_cell_bottom = layout.photo_area_top();
    for (i, shot) in shots.iter().enumerate() {
        let (cell_x, cell_y) = layout.cell_origin(i as u32);
        draw_shot(&mut canvas, layout, shot, cell_x, cell_y);
        last_cell_bottom = cell_y + layout.cell_height;
    }

    draw_footer(&mut canvas, layout, last_cell_bottom);

    log::info!(
        "Composed {}x{} strip from {} shot(s)",
        layout.width,
        layout.height,
        shots.len()
    );

    Ok(CompositedStrip {
        pixels: canvas,
        composed_at: Utc::now(),
    })
}

fn fill_vertical_gradient(canvas: &mut RgbaImage, top: Rgba<u8>, bottom: Rgba<u8>) {
    let height = canvas.height();
    for y in 0..height {
        let t = y as f32 / (height - 1).max(1) as f32;
        let mut color = [0u8; 4];
        for c in 0..4 {
            color[c] = (top.0[c] as f32 + (bottom.0[c] as f32 - top.0[c] as f32) * t).round() as u8;
        }
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, Rgba(color));
        }
    }
}

// Three equal horizontal segments at the top and bottom edges
fn draw_bands(canvas: &mut RgbaImage, layout: &StripLayout) {
    let segment = layout.width / 3;
    let bottom_y = (layout.height - layout.band_height) as i32;

    for (i, color) in layout.band_colors.iter().enumerate() {
        let x = (i as u32 * segment) as i32;
        // Last segment absorbs the rounding remainder
        let w = if i == 2 { layout.width - 2 * segment } else { segment };
        draw_filled_rect_mut(
            canvas,
            Rect::at(x, 0).of_size(w, layout.band_height),
            *color,
        );
        draw_filled_rect_mut(
            canvas,
            Rect::at(x, bottom_y).of_size(w, layout.band_height),
            *color,
        );
    }
}

fn draw_header(canvas: &mut RgbaImage, layout: &StripLayout, taken_at: DateTime<Utc>) {
    text::draw_centered(
        canvas,
        text::heading_font(),
        &layout.header_text,
        layout.header_px,
        layout.header_baseline(),
        layout.text_color,
    );
    text::draw_centered(
        canvas,
        text::body_font(),
        &layout.subheader_text,
        layout.subheader_px,
        layout.subheader_baseline(),
        layout.text_color,
    );
    let date = taken_at.format("%Y-%m-%d").to_string();
    text::draw_centered(
        canvas,
        text::body_font(),
        &date,
        layout.date_px,
        layout.date_baseline(),
        layout.text_color,
    );
}

// Cover-place one shot into its cell, clip the overflow, frame and stamp it
fn draw_shot(
    canvas: &mut RgbaImage,
    layout: &StripLayout,
    shot: &CapturedImage,
    cell_x: u32,
    cell_y: u32,
) {
    let cell_w = layout.cell_width();
    let cell_h = layout.cell_height;

    if let Some(shadow) = layout.shadow_color {
        draw_hollow_rect_mut(
            canvas,
            Rect::at(cell_x as i32 + 2, cell_y as i32 + 2).of_size(cell_w, cell_h),
            shadow,
        );
    }

    let placement = cover_placement(shot.width(), shot.height(), cell_w, cell_h);
    let scaled = imageops::resize(
        shot.pixels(),
        placement.width,
        placement.height,
        FilterType::Triangle,
    );

    // Visible portion of the scaled image inside the cell
    let src_x = (-placement.x).max(0) as u32;
    let src_y = (-placement.y).max(0) as u32;
    let dst_x = cell_x as i64 + placement.x.max(0);
    let dst_y = cell_y as i64 + placement.y.max(0);
    let visible_w = (cell_w as i64 - placement.x.max(0))
        .min(placement.width as i64 - src_x as i64)
        .max(0) as u32;
    let visible_h = (cell_h as i64 - placement.y.max(0))
        .min(placement.height as i64 - src_y as i64)
        .max(0) as u32;

    if visible_w > 0 && visible_h > 0 {
        let visible = imageops::crop_imm(&scaled, src_x, src_y, visible_w, visible_h).to_image();
        imageops::overlay(canvas, &visible, dst_x, dst_y);
    }

    draw_hollow_rect_mut(
        canvas,
        Rect::at(cell_x as i32, cell_y as i32).of_size(cell_w, cell_h),
        layout.frame_color,
    );

    text::stamp(
        canvas,
        &shot.index().to_string(),
        layout.index_px,
        cell_x as i32 + 6,
        cell_y as i32 + 4,
        Rgba([255, 255, 255, 255]),
    );
}

fn draw_footer(canvas: &mut RgbaImage, layout: &StripLayout, last_cell_bottom: u32) {
    for (line, caption) in layout.footer_lines.iter().enumerate() {
        text::draw_centered(
            canvas,
            text::heading_font(),
            caption,
            layout.footer_px,
            layout.footer_baseline(last_cell_bottom, line as u32),
            layout.text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booth::types::CapturedImage;

    fn solid_shot(index: u32, w: u32, h: u32, color: Rgba<u8>) -> CapturedImage {
        CapturedImage::new(index, Utc::now(), RgbaImage::from_pixel(w, h, color))
    }

    fn full_session() -> Vec<CapturedImage> {
        vec![
            solid_shot(1, 1280, 720, Rgba([200, 30, 30, 255])),
            solid_shot(2, 1280, 720, Rgba([30, 200, 30, 255])),
            solid_shot(3, 1280, 720, Rgba([30, 30, 200, 255])),
        ]
    }

    #[test]
    fn test_compose_rejects_empty_session() {
        let strip = compose(&[], &StripLayout::classic());
        assert!(matches!(strip, Err(CompositeError::EmptySession)));
    }

    #[test]
    fn test_compose_rejects_overfull_session() {
        let mut shots = full_session();
        shots.push(solid_shot(4, 64, 64, Rgba([0, 0, 0, 255])));
        let strip = compose(&shots, &StripLayout::classic());
        assert!(matches!(strip, Err(CompositeError::TooManyShots(4))));
    }

    #[test]
    fn test_compose_produces_layout_dimensions() {
        let strip = compose(&full_session(), &StripLayout::classic()).unwrap();
        assert_eq!(strip.width(), 400);
        assert_eq!(strip.height(), 900);
    }

    #[test]
    fn test_classic_bands_and_background() {
        let strip = compose(&full_session(), &StripLayout::classic()).unwrap();
        let px = strip.pixels();

        // Top band: red / blue / red thirds
        assert_eq!(*px.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*px.get_pixel(200, 10), Rgba([0, 68, 170, 255]));
        assert_eq!(*px.get_pixel(390, 10), Rgba([255, 0, 0, 255]));
        // Bottom band mirrors the top
        assert_eq!(*px.get_pixel(200, 880), Rgba([0, 68, 170, 255]));
        // Margin stays background white
        assert_eq!(*px.get_pixel(5, 200), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_shots_land_in_their_cells() {
        let layout = StripLayout::classic();
        let strip = compose(&full_session(), &layout).unwrap();
        let px = strip.pixels();

        for (i, expected) in [
            Rgba([200, 30, 30, 255]),
            Rgba([30, 200, 30, 255]),
            Rgba([30, 30, 200, 255]),
        ]
        .iter()
        .enumerate()
        {
            let (cx, cy) = layout.cell_origin(i as u32);
            let center = px.get_pixel(cx + layout.cell_width() / 2, cy + layout.cell_height / 2);
            assert_eq!(center, expected, "cell {} center", i);
        }
    }

    #[test]
    fn test_wide_shot_never_bleeds_outside_cell() {
        // A 4:1 shot cover-fits the 340x160 cell and must be clipped to it
        let layout = StripLayout::classic();
        let shots = vec![solid_shot(1, 1600, 400, Rgba([0, 128, 0, 255]))];
        let strip = compose(&shots, &layout).unwrap();
        let px = strip.pixels();

        let (cx, cy) = layout.cell_origin(0);
        assert_eq!(
            *px.get_pixel(cx + 5, cy + layout.cell_height / 2),
            Rgba([0, 128, 0, 255])
        );
        // One pixel left of the cell is still background
        assert_eq!(
            *px.get_pixel(cx - 2, cy + layout.cell_height / 2),
            Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_partial_strip_composes() {
        // Fewer than the full shot count still lays out from the top
        let shots = vec![solid_shot(1, 640, 480, Rgba([10, 10, 10, 255]))];
        let strip = compose(&shots, &StripLayout::classic()).unwrap();
        assert_eq!(strip.width(), 400);
    }

    #[test]
    fn test_midnight_gradient_background() {
        let strip = compose(&full_session(), &StripLayout::midnight()).unwrap();
        let px = strip.pixels();
        // Margin pixels darken toward the bottom of the gradient
        let upper = px.get_pixel(5, 150);
        let lower = px.get_pixel(5, 820);
        assert!(lower.0[0] < upper.0[0]);
    }
}
