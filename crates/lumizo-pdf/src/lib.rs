//! PDF exports: the product catalog and the cart quote.

pub mod catalog;
pub mod error;
pub mod images;
pub mod layout;
pub mod quote;
pub mod render;

use std::path::Path;

use chrono::{DateTime, Utc};

pub use catalog::{catalog_document, export_catalog, NameIndex};
pub use error::PdfError;
pub use images::{load_images, CellImage, HttpImageSource, ImageSource};
pub use quote::{export_quote, quote_document};
pub use render::TableDocument;

/// Document-level settings shared by both exports.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub company_name: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportOptions {
    #[must_use]
    pub fn new(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_owned(),
            generated_at: Utc::now(),
        }
    }
}

/// Writes rendered bytes to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be written.
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<(), PdfError> {
    let io_err = |source| PdfError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}
