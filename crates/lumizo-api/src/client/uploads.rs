//! File uploads. Every upload is a multipart POST with the file in the
//! `file` field.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::LumizoClient;
use crate::error::ApiError;
use crate::types::UploadedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProductImage,
    SpecSheet,
    BrandImage,
}

impl UploadKind {
    /// Path segment under `/upload`.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            UploadKind::ProductImage => "product-image",
            UploadKind::SpecSheet => "spec-sheet",
            UploadKind::BrandImage => "brand-image",
        }
    }
}

impl LumizoClient {
    /// Uploads one local file.
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`] if the file cannot be read, or
    /// [`ApiError::UnexpectedStatus`] if the backend rejects it.
    pub async fn upload(&self, kind: UploadKind, path: &Path) -> Result<UploadedFile, ApiError> {
        let url = self.endpoint(&["upload", kind.segment()]);
        let form = Form::new().part("file", file_part(path).await?);
        tracing::info!(kind = kind.segment(), path = %path.display(), "uploading file");
        self.send_multipart(Method::POST, url, form, kind.segment())
            .await
    }

    /// `DELETE /upload/{publicId}`. Slashes in the id are percent-encoded.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn delete_upload(&self, public_id: &str) -> Result<(), ApiError> {
        self.delete(self.endpoint(&["upload", public_id])).await
    }
}

pub(super) async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(content_type(path))?)
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type(Path::new("a/logo.PNG")), "image/png");
        assert_eq!(content_type(Path::new("sheet.pdf")), "application/pdf");
        assert_eq!(content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn upload_kinds_map_to_routes() {
        assert_eq!(UploadKind::ProductImage.segment(), "product-image");
        assert_eq!(UploadKind::SpecSheet.segment(), "spec-sheet");
        assert_eq!(UploadKind::BrandImage.segment(), "brand-image");
    }
}
