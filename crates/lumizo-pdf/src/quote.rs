//! Cart quote export.

use lumizo_core::pricing::format_price;
use lumizo_core::{Cart, CartItem};
use rust_decimal::Decimal;

use crate::images::{load_images, CellImage, ImageSource};
use crate::layout::PageLayout;
use crate::render::{Align, Column, Row, TableDocument};
use crate::{ExportOptions, PdfError};

fn columns() -> Vec<Column> {
    vec![
        Column::new("Image", 0.12, Align::Left),
        Column::new("Product", 0.28, Align::Left),
        Column::new("Variant", 0.20, Align::Left),
        Column::new("Qty", 0.07, Align::Right),
        Column::new("Unit price", 0.16, Align::Right),
        Column::new("Line total", 0.17, Align::Right),
    ]
}

fn price_or_dash(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_owned(), format_price)
}

fn row(item: &CartItem, image: Option<CellImage>) -> Row {
    let mut product = item.product.name.clone();
    if let Some(model) = &item.product.model {
        product = format!("{product} ({model})");
    }
    let variant = item.selection.describe();
    Row {
        image,
        cells: vec![
            product,
            if variant.is_empty() { "-".to_owned() } else { variant },
            item.quantity.to_string(),
            price_or_dash(item.unit_price()),
            price_or_dash(item.line_total()),
        ],
    }
}

/// Lays out the quote table. `images` pairs with the cart lines by index.
#[must_use]
pub fn quote_document(cart: &Cart, options: &ExportOptions, images: Vec<CellImage>) -> TableDocument {
    let rows = cart
        .items
        .iter()
        .zip(images.into_iter().map(Some).chain(std::iter::repeat(None)))
        .map(|(item, image)| row(item, image))
        .collect();

    TableDocument {
        title: format!("{} Quotation", options.company_name),
        subtitle: vec![
            format!("Date: {}", options.generated_at.format("%d %b %Y")),
            format!(
                "{} line(s), {} unit(s)",
                cart.items.len(),
                cart.item_count()
            ),
        ],
        columns: columns(),
        image_column: true,
        rows,
        summary: vec![format!("Grand total: {}", format_price(cart.total()))],
        layout: PageLayout::default(),
    }
}

/// Fetches line images one by one and renders the quote.
///
/// An empty cart is a no-op: `Ok(None)`, no request, no document.
///
/// # Errors
///
/// Returns [`PdfError::Render`] if the document cannot be produced.
pub async fn export_quote<S: ImageSource>(
    source: &S,
    cart: &Cart,
    options: &ExportOptions,
) -> Result<Option<Vec<u8>>, PdfError> {
    if cart.is_empty() {
        tracing::info!("quote export skipped: cart is empty");
        return Ok(None);
    }
    let urls: Vec<Option<&str>> = cart.items.iter().map(|i| i.product.primary_image()).collect();
    let images = load_images(source, &urls).await;
    tracing::info!(lines = cart.items.len(), "rendering quote export");
    quote_document(cart, options, images).render().map(Some)
}
