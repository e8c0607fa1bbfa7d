//! Draws a paginated table document with `printpdf`.

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};

use crate::error::PdfError;
use crate::images::CellImage;
use crate::layout::{column_widths, fit_image, fit_text, PageLayout, IMAGE_DPI};

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 9.0;
const HEADER_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 8.5;
const CELL_PADDING: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    /// Relative width; columns are scaled to the page content width.
    pub ratio: f32,
    pub align: Align,
}

impl Column {
    pub fn new(title: &str, ratio: f32, align: Align) -> Self {
        Self {
            title: title.to_owned(),
            ratio,
            align,
        }
    }
}

/// One table row. When the document has an image column, `image` fills
/// column 0 and `cells` the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub image: Option<CellImage>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDocument {
    pub title: String,
    pub subtitle: Vec<String>,
    pub columns: Vec<Column>,
    pub image_column: bool,
    pub rows: Vec<Row>,
    /// Right-aligned lines printed after the last row, e.g. the grand total.
    pub summary: Vec<String>,
    pub layout: PageLayout,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl TableDocument {
    /// Renders the document to PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Render`] if `printpdf` fails, or an image error
    /// if stored image data no longer decodes.
    pub fn render(&self) -> Result<Vec<u8>, PdfError> {
        let layout = self.layout;
        let (doc, first_page, first_layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(layout.width),
            Mm(layout.height),
            "Layer 1",
        );
        let fonts = Fonts {
            regular: add_font(&doc, BuiltinFont::Helvetica)?,
            bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
        };
        let widths = column_widths(
            &self.columns.iter().map(|c| c.ratio).collect::<Vec<_>>(),
            layout.content_width(),
        );

        let pages = layout.paginate(self.rows.len());
        let page_count = pages.len();
        for (index, range) in pages.into_iter().enumerate() {
            let first = index == 0;
            let layer = if first {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(layout.width), Mm(layout.height), "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            if first {
                self.draw_title(&layer, &fonts);
            }
            let header_top = layout.table_top(first);
            self.draw_header(&layer, &fonts, &widths, header_top);

            let mut row_top = header_top - layout.header_height;
            for row in &self.rows[range] {
                self.draw_row(&layer, &fonts, &widths, row, row_top)?;
                row_top -= layout.row_height;
            }

            if index + 1 == page_count {
                self.draw_summary(&layer, &fonts, row_top);
            }
            layer.use_text(
                format!("Page {} of {page_count}", index + 1),
                BODY_SIZE,
                Mm(layout.width - layout.margin - 22.0),
                Mm(layout.margin - 4.0),
                &fonts.regular,
            );
        }

        doc.save_to_bytes()
            .map_err(|e| PdfError::Render(e.to_string()))
    }

    fn draw_title(&self, layer: &PdfLayerReference, fonts: &Fonts) {
        let layout = self.layout;
        let mut y = layout.height - layout.margin - 7.0;
        layer.use_text(
            self.title.as_str(),
            TITLE_SIZE,
            Mm(layout.margin),
            Mm(y),
            &fonts.bold,
        );
        for line in &self.subtitle {
            y -= 5.0;
            layer.use_text(line.as_str(), SUBTITLE_SIZE, Mm(layout.margin), Mm(y), &fonts.regular);
        }
    }

    fn draw_header(&self, layer: &PdfLayerReference, fonts: &Fonts, widths: &[f32], top: f32) {
        let layout = self.layout;
        let bottom = top - layout.header_height;
        let mut x = layout.margin;
        for (column, width) in self.columns.iter().zip(widths) {
            let text = fit_text(&column.title, width - 2.0 * CELL_PADDING, HEADER_SIZE);
            let text_x = aligned_x(x, *width, &text, HEADER_SIZE, column.align);
            layer.use_text(text, HEADER_SIZE, Mm(text_x), Mm(bottom + 3.0), &fonts.bold);
            x += width;
        }
        layer.set_outline_color(Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None)));
        layer.set_outline_thickness(0.8);
        layer.add_line(hline(layout.margin, layout.width - layout.margin, bottom));
        layer.add_line(hline(layout.margin, layout.width - layout.margin, top));
    }

    fn draw_row(
        &self,
        layer: &PdfLayerReference,
        fonts: &Fonts,
        widths: &[f32],
        row: &Row,
        top: f32,
    ) -> Result<(), PdfError> {
        let layout = self.layout;
        let bottom = top - layout.row_height;
        let mut x = layout.margin;
        let mut columns = self.columns.iter().zip(widths);

        if self.image_column {
            if let Some((_, width)) = columns.next() {
                match &row.image {
                    Some(image) => {
                        draw_image_cell(layer, fonts, image, x, bottom, *width, layout.row_height)?;
                    }
                    None => draw_placeholder(layer, fonts, x, bottom, *width, layout.row_height),
                }
                x += width;
            }
        }

        let text_y = bottom + layout.row_height / 2.0 - 1.2;
        for ((column, width), value) in columns.zip(&row.cells) {
            let text = fit_text(value, width - 2.0 * CELL_PADDING, BODY_SIZE);
            let text_x = aligned_x(x, *width, &text, BODY_SIZE, column.align);
            layer.use_text(text, BODY_SIZE, Mm(text_x), Mm(text_y), &fonts.regular);
            x += width;
        }

        layer.set_outline_color(Color::Rgb(Rgb::new(0.8, 0.8, 0.8, None)));
        layer.set_outline_thickness(0.3);
        layer.add_line(hline(layout.margin, layout.width - layout.margin, bottom));
        Ok(())
    }

    fn draw_summary(&self, layer: &PdfLayerReference, fonts: &Fonts, below: f32) {
        let layout = self.layout;
        let mut y = below - 7.0;
        for line in &self.summary {
            let width = layout.content_width();
            let x = aligned_x(layout.margin, width, line, HEADER_SIZE + 1.0, Align::Right);
            layer.use_text(line.as_str(), HEADER_SIZE + 1.0, Mm(x), Mm(y), &fonts.bold);
            y -= 5.5;
        }
    }
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, PdfError> {
    doc.add_builtin_font(font)
        .map_err(|e| PdfError::Render(e.to_string()))
}

fn draw_image_cell(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    image: &CellImage,
    x: f32,
    bottom: f32,
    width: f32,
    height: f32,
) -> Result<(), PdfError> {
    let placement = match image {
        CellImage::Embedded {
            width_px,
            height_px,
            ..
        } => fit_image(*width_px, *height_px, width, height, CELL_PADDING),
        CellImage::Placeholder => None,
    };

    match (placement, image.decode()?) {
        (Some(placement), Some(pixels)) => {
            let rgb = image::DynamicImage::ImageRgb8(pixels.to_rgb8());
            Image::from_dynamic_image(&rgb).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x + placement.offset_x)),
                    translate_y: Some(Mm(bottom + placement.offset_y)),
                    scale_x: Some(placement.scale),
                    scale_y: Some(placement.scale),
                    dpi: Some(IMAGE_DPI),
                    ..Default::default()
                },
            );
        }
        _ => draw_placeholder(layer, fonts, x, bottom, width, height),
    }
    Ok(())
}

/// Grey box with "No image" in the middle.
fn draw_placeholder(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    x: f32,
    bottom: f32,
    width: f32,
    height: f32,
) {
    let (left, right) = (x + CELL_PADDING, x + width - CELL_PADDING);
    let (low, high) = (bottom + CELL_PADDING, bottom + height - CELL_PADDING);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.7, 0.7, 0.7, None)));
    layer.set_outline_thickness(0.4);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(left), Mm(low)), false),
            (Point::new(Mm(right), Mm(low)), false),
            (Point::new(Mm(right), Mm(high)), false),
            (Point::new(Mm(left), Mm(high)), false),
        ],
        is_closed: true,
    });
    let label = fit_text("No image", right - left, 7.0);
    let label_x = x + (width - text_width(&label, 7.0)) / 2.0;
    layer.use_text(label, 7.0, Mm(label_x), Mm(bottom + height / 2.0 - 1.0), &fonts.regular);
}

fn hline(x1: f32, x2: f32, y: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    }
}

#[allow(clippy::cast_precision_loss)]
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

fn aligned_x(cell_x: f32, cell_width: f32, text: &str, font_size: f32, align: Align) -> f32 {
    match align {
        Align::Left => cell_x + CELL_PADDING,
        Align::Right => cell_x + cell_width - CELL_PADDING - text_width(text, font_size),
    }
}
