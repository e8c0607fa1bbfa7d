//! Product catalog export.

use std::collections::HashMap;

use lumizo_core::pricing::format_price;
use lumizo_core::{Brand, Category, Product};

use crate::images::{load_images, CellImage, ImageSource};
use crate::layout::PageLayout;
use crate::render::{Align, Column, Row, TableDocument};
use crate::{ExportOptions, PdfError};

/// Resolves brand and category ids to names when the product only carries
/// the id.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    brands: HashMap<String, String>,
    categories: HashMap<String, String>,
}

impl NameIndex {
    #[must_use]
    pub fn new(brands: &[Brand], categories: &[Category]) -> Self {
        Self {
            brands: brands.iter().map(|b| (b.id.clone(), b.name.clone())).collect(),
            categories: categories
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn brand(&self, product: &Product) -> Option<String> {
        let brand = product.brand.as_ref()?;
        brand
            .name()
            .map(str::to_owned)
            .or_else(|| self.brands.get(brand.id()).cloned())
    }

    #[must_use]
    pub fn category(&self, product: &Product) -> Option<String> {
        let category = product.category.as_ref()?;
        category
            .name()
            .map(str::to_owned)
            .or_else(|| self.categories.get(category.id()).cloned())
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("Image", 0.14, Align::Left),
        Column::new("Product", 0.30, Align::Left),
        Column::new("Model", 0.13, Align::Left),
        Column::new("Brand", 0.13, Align::Left),
        Column::new("Category", 0.16, Align::Left),
        Column::new("Price", 0.14, Align::Right),
    ]
}

/// Lays out the catalog table. `images` pairs with `products` by index.
#[must_use]
pub fn catalog_document(
    products: &[Product],
    names: &NameIndex,
    options: &ExportOptions,
    images: Vec<CellImage>,
) -> TableDocument {
    let dash = || "-".to_owned();
    let rows = products
        .iter()
        .zip(images.into_iter().map(Some).chain(std::iter::repeat(None)))
        .map(|(product, image)| Row {
            image,
            cells: vec![
                product.name.clone(),
                product.model.clone().unwrap_or_else(dash),
                names.brand(product).unwrap_or_else(dash),
                names.category(product).unwrap_or_else(dash),
                product
                    .active_price()
                    .map_or_else(|| "On request".to_owned(), format_price),
            ],
        })
        .collect();

    TableDocument {
        title: format!("{} Product Catalog", options.company_name),
        subtitle: vec![
            format!("Generated {}", options.generated_at.format("%d %b %Y %H:%M UTC")),
            format!("{} products", products.len()),
        ],
        columns: columns(),
        image_column: true,
        rows,
        summary: Vec::new(),
        layout: PageLayout::default(),
    }
}

/// Fetches product images one by one and renders the catalog.
///
/// Returns `Ok(None)` without fetching anything when `products` is empty.
///
/// # Errors
///
/// Returns [`PdfError::Render`] if the document cannot be produced. Image
/// failures never surface here; they become placeholders.
pub async fn export_catalog<S: ImageSource>(
    source: &S,
    products: &[Product],
    names: &NameIndex,
    options: &ExportOptions,
) -> Result<Option<Vec<u8>>, PdfError> {
    if products.is_empty() {
        tracing::info!("catalog export skipped: no products");
        return Ok(None);
    }
    let urls: Vec<Option<&str>> = products.iter().map(Product::primary_image).collect();
    let images = load_images(source, &urls).await;
    let placeholders = images.iter().filter(|i| i.is_placeholder()).count();
    tracing::info!(products = products.len(), placeholders, "rendering catalog export");
    catalog_document(products, names, options, images)
        .render()
        .map(Some)
}
