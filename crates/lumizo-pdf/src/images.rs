//! Remote image loading for exports.
//!
//! Images are fetched one at a time and kept base64-encoded until they are
//! drawn. Any failure (network, status, undecodable bytes) degrades that one
//! cell to a placeholder; nothing is retried.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::GenericImageView;
use reqwest::Client;

use crate::error::PdfError;

/// Where export images come from.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PdfError>;
}

/// Fetches images over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    /// # Errors
    ///
    /// Returns [`PdfError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PdfError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PdfError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PdfError::ImageStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// An image ready to be placed in a table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellImage {
    Embedded {
        base64: String,
        width_px: u32,
        height_px: u32,
    },
    Placeholder,
}

impl CellImage {
    /// Encodes raw image bytes, checking they decode and recording the
    /// pixel size for the centering math.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ImageDecode`] for unsupported or corrupt data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width_px, height_px) = decoded.dimensions();
        Ok(CellImage::Embedded {
            base64: STANDARD.encode(bytes),
            width_px,
            height_px,
        })
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CellImage::Placeholder)
    }

    /// Decodes the stored data back into pixels for drawing.
    pub(crate) fn decode(&self) -> Result<Option<image::DynamicImage>, PdfError> {
        match self {
            CellImage::Embedded { base64, .. } => {
                let bytes = STANDARD.decode(base64)?;
                Ok(Some(image::load_from_memory(&bytes)?))
            }
            CellImage::Placeholder => Ok(None),
        }
    }
}

/// Loads each image in order, awaiting one before requesting the next.
/// Missing URLs and failures become placeholders.
pub async fn load_images<S: ImageSource>(source: &S, urls: &[Option<&str>]) -> Vec<CellImage> {
    let mut images = Vec::with_capacity(urls.len());
    for url in urls {
        let image = match url {
            Some(url) => match fetch_one(source, url).await {
                Ok(image) => image,
                Err(err) => {
                    tracing::warn!(url, error = %err, "image unavailable, using placeholder");
                    CellImage::Placeholder
                }
            },
            None => CellImage::Placeholder,
        };
        images.push(image);
    }
    images
}

async fn fetch_one<S: ImageSource>(source: &S, url: &str) -> Result<CellImage, PdfError> {
    let bytes = source.fetch(url).await?;
    CellImage::from_bytes(&bytes)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    /// A tiny solid PNG of the given size.
    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 180, 40]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }
}
