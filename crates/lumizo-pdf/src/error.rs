use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image request to {url} returned status {status}")]
    ImageStatus { url: String, status: u16 },

    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
