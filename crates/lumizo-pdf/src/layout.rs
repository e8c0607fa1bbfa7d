//! Page geometry for the table exports. All lengths are millimetres.

use std::ops::Range;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Resolution images are embedded at; a pixel is `25.4 / DPI` mm.
pub const IMAGE_DPI: f32 = 150.0;

const MM_PER_INCH: f32 = 25.4;
const MM_PER_POINT: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Vertical budget of an A4 page holding a title block and a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Title and subtitle lines; printed on the first page only.
    pub title_height: f32,
    pub header_height: f32,
    pub row_height: f32,
    /// Space reserved below the table for totals and the page number.
    pub footer_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            margin: 12.0,
            title_height: 24.0,
            header_height: 9.0,
            row_height: 24.0,
            footer_height: 16.0,
        }
    }
}

impl PageLayout {
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Rows that fit below the header on a page.
    #[must_use]
    pub fn rows_per_page(&self, first_page: bool) -> usize {
        let mut available =
            self.height - 2.0 * self.margin - self.header_height - self.footer_height;
        if first_page {
            available -= self.title_height;
        }
        if available <= 0.0 || self.row_height <= 0.0 {
            return 1;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rows = (available / self.row_height).floor() as usize;
        rows.max(1)
    }

    /// Splits `row_count` rows into per-page ranges. An empty table still
    /// gets one (empty) page.
    #[must_use]
    pub fn paginate(&self, row_count: usize) -> Vec<Range<usize>> {
        let mut pages = Vec::new();
        let mut start = 0;
        let mut first = true;
        loop {
            let end = (start + self.rows_per_page(first)).min(row_count);
            pages.push(start..end);
            if end >= row_count {
                break;
            }
            start = end;
            first = false;
        }
        pages
    }

    /// Top edge (from the page bottom) of the table header.
    #[must_use]
    pub fn table_top(&self, first_page: bool) -> f32 {
        let top = self.height - self.margin;
        if first_page {
            top - self.title_height
        } else {
            top
        }
    }
}

/// Scales `ratios` so they sum to `total`. Non-positive ratios get no width.
#[must_use]
pub fn column_widths(ratios: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = ratios.iter().filter(|r| **r > 0.0).sum();
    if sum <= 0.0 {
        return vec![0.0; ratios.len()];
    }
    ratios
        .iter()
        .map(|r| if *r > 0.0 { total * r / sum } else { 0.0 })
        .collect()
}

/// Where and how large to draw an image inside a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Offset of the image's lower-left corner from the cell's lower-left.
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    /// Factor applied to the image's natural size at [`IMAGE_DPI`].
    pub scale: f32,
}

/// Fits an image into a `cell_width × cell_height` cell minus `padding` on
/// every side, preserving aspect ratio, and centres it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_image(
    width_px: u32,
    height_px: u32,
    cell_width: f32,
    cell_height: f32,
    padding: f32,
) -> Option<ImagePlacement> {
    if width_px == 0 || height_px == 0 {
        return None;
    }
    let natural_w = width_px as f32 / IMAGE_DPI * MM_PER_INCH;
    let natural_h = height_px as f32 / IMAGE_DPI * MM_PER_INCH;
    let box_w = (cell_width - 2.0 * padding).max(0.0);
    let box_h = (cell_height - 2.0 * padding).max(0.0);
    let scale = (box_w / natural_w).min(box_h / natural_h);
    let width = natural_w * scale;
    let height = natural_h * scale;
    Some(ImagePlacement {
        offset_x: (cell_width - width) / 2.0,
        offset_y: (cell_height - height) / 2.0,
        width,
        height,
        scale,
    })
}

/// Shortens `text` with a trailing `...` so it fits in `width` mm at
/// `font_size` pt, using an average glyph width.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_text(text: &str, width: f32, font_size: f32) -> String {
    let glyph = font_size * AVG_GLYPH_WIDTH * MM_PER_POINT;
    if glyph <= 0.0 || width <= 0.0 {
        return String::new();
    }
    let max_chars = (width / glyph).floor() as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_owned();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}
