/**
 * ============================================================================
 * STRIP LAYOUT MODULE
 * ============================================================================
 *
 * PURPOSE: Layout constants for the composited strip and the placement math
 *
 * A StripLayout is fixed configuration, never mutated at runtime. The two
 * built-in presets share one compositor; everything that differed between
 * the original strip styles lives here as data.
 *
 * GEOMETRY (classic preset):
 * - 400x900 canvas, 30px tricolor bands top and bottom
 * - header baselines at band+50 and band+75, date beneath
 * - photo area from band+100: 340x160 cells with 20px spacing
 * - footer baselines at last_cell_bottom + spacing + 40 / + 75
 *
 * ============================================================================
 */

use image::Rgba;

// Scaled placement of an image inside a fixed cell. Offsets are relative
// to the cell origin and go negative on the axis the image overflows;
// the compositor clips the overflow to the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

// Aspect-preserving cover placement. Given image ratio ir = img_w/img_h
// and cell ratio rr = cell_w/cell_h: if ir > rr the image is wider, so it
// fits the cell height and centers horizontally; otherwise it fits the
// cell width and centers vertically. Aspect ratio is never distorted.
pub fn cover_placement(img_w: u32, img_h: u32, cell_w: u32, cell_h: u32) -> CellPlacement {
    let ir = img_w as f64 / img_h as f64;
    let rr = cell_w as f64 / cell_h as f64;

    let (width, height) = if ir > rr {
        ((cell_h as f64 * ir).round() as u32, cell_h)
    } else {
        (cell_w, (cell_w as f64 / ir).round() as u32)
    };

    CellPlacement {
        x: (cell_w as i64 - width as i64) / 2,
        y: (cell_h as i64 - height as i64) / 2,
        width,
        height,
    }
}

// Built-in strip styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripStyle {
    // White air-mail strip with red/blue bands
    #[default]
    Classic,
    // Dark gradient strip with pale text
    Midnight,
}

// Fixed layout for one strip style
#[derive(Debug, Clone)]
pub struct StripLayout {
    // Output canvas dimensions
    pub width: u32,
    pub height: u32,

    // Background: bottom color optional; when present the fill is a
    // vertical gradient from `background` down to `background_bottom`
    pub background: Rgba<u8>,
    pub background_bottom: Option<Rgba<u8>>,

    // Decorative bands at top and bottom: three equal segments
    pub band_height: u32,
    pub band_colors: [Rgba<u8>; 3],

    // Header block
    pub header_text: String,
    pub subheader_text: String,
    pub header_px: f32,
    pub subheader_px: f32,
    pub date_px: f32,

    // Photo cells: horizontal margin, fixed cell height, vertical spacing
    pub margin_x: u32,
    pub cell_height: u32,
    pub cell_spacing: u32,

    // Thin frame around each photo, optional drop shadow behind it
    pub frame_color: Rgba<u8>,
    pub shadow_color: Option<Rgba<u8>>,

    // 1-based index stamped in each cell corner
    pub index_px: f32,

    // Footer caption lines after the last photo
    pub footer_lines: Vec<String>,
    pub footer_px: f32,

    pub text_color: Rgba<u8>,
}

impl StripLayout {
    pub fn for_style(style: StripStyle) -> Self {
        match style {
            StripStyle::Classic => Self::classic(),
            StripStyle::Midnight => Self::midnight(),
        }
    }

    // The air-mail style of the original strip
    pub fn classic() -> Self {
        Self {
            width: 400,
            height: 900,
            background: Rgba([255, 255, 255, 255]),
            background_bottom: None,
            band_height: 30,
            band_colors: [
                Rgba([255, 0, 0, 255]),
                Rgba([0, 68, 170, 255]),
                Rgba([255, 0, 0, 255]),
            ],
            header_text: "SMARTPEOPLE".to_string(),
            subheader_text: "MOST SMART TECHNOLOGY".to_string(),
            header_px: 28.0,
            subheader_px: 14.0,
            date_px: 12.0,
            margin_x: 30,
            cell_height: 160,
            cell_spacing: 20,
            frame_color: Rgba([221, 221, 221, 255]),
            shadow_color: None,
            index_px: 16.0,
            footer_lines: vec!["BACK TO".to_string(), "OFFICE".to_string()],
            footer_px: 28.0,
            text_color: Rgba([0, 0, 0, 255]),
        }
    }

    // Dark variant, same geometry
    pub fn midnight() -> Self {
        Self {
            background: Rgba([24, 26, 38, 255]),
            background_bottom: Some(Rgba([8, 9, 14, 255])),
            band_colors: [
                Rgba([212, 175, 55, 255]),
                Rgba([240, 240, 240, 255]),
                Rgba([212, 175, 55, 255]),
            ],
            frame_color: Rgba([90, 94, 120, 255]),
            shadow_color: Some(Rgba([0, 0, 0, 255])),
            text_color: Rgba([235, 235, 235, 255]),
            ..Self::classic()
        }
    }

    // Width of a photo cell
    pub fn cell_width(&self) -> u32 {
        self.width - 2 * self.margin_x
    }

    // Top of the photo area, below the header block
    pub fn photo_area_top(&self) -> u32 {
        self.band_height + 100
    }

    // Origin of the 0-based cell `index`
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        (
            self.margin_x,
            self.photo_area_top() + index * (self.cell_height + self.cell_spacing),
        )
    }

    // Header baselines, measured from the top band like the original
    pub fn header_baseline(&self) -> u32 {
        self.band_height + 50
    }

    pub fn subheader_baseline(&self) -> u32 {
        self.band_height + 75
    }

    pub fn date_baseline(&self) -> u32 {
        self.band_height + 92
    }

    // Footer baselines, measured from the bottom of the last cell
    pub fn footer_baseline(&self, last_cell_bottom: u32, line: u32) -> u32 {
        last_cell_bottom + self.cell_spacing + 40 + line * 35
    }
}

impl Default for StripLayout {
    fn default() -> Self {
        Self::classic()
    }
}
