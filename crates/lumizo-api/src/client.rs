//! HTTP client for the Lumizo REST API.
//!
//! One [`LumizoClient`] covers every `/api` resource. Reads go through
//! [`RetryPolicy`]; writes are sent exactly once. Non-2xx responses
//! become [`ApiError::NotFound`] or [`ApiError::UnexpectedStatus`] carrying
//! the start of the response body.

mod taxonomy;
mod uploads;

use std::time::Duration;

use lumizo_core::{
    AppConfig, BulkCreatePayload, BulkOutcome, BulkUpdatePayload, Product, ProductInput,
    ProductPage, ProductQuery,
};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::retry::{retry_transient, RetryPolicy};
use crate::types::{BulkResponse, EntityResponse, ProductSearchResponse};

pub use uploads::UploadKind;

/// Longest slice of an error response body kept in [`ApiError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the Lumizo REST API.
///
/// Use [`LumizoClient::new`] with the loaded [`AppConfig`], or
/// [`LumizoClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct LumizoClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl LumizoClient {
    /// Builds a client from configuration, including the GET retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ApiError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(RetryPolicy::from_config(config)))
    }

    /// Builds a client for `base_url` without retries.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            retry: RetryPolicy::NONE,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Searches products (`GET /products`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure after retries.
    /// - [`ApiError::UnexpectedStatus`] for a non-2xx response.
    /// - [`ApiError::Deserialize`] if the body matches neither the bare-array
    ///   nor the paged shape.
    pub async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let mut url = self.endpoint(&["products"]);
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        let response: ProductSearchResponse = self.get_json(url, "product search").await?;
        Ok(response.into_page())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id, otherwise as
    /// [`Self::search_products`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id]);
        let response: EntityResponse<Product> =
            self.get_json(url, &format!("product {id}")).await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the input.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products"]);
        let response: EntityResponse<Product> = self
            .send_json(Method::POST, url, input, "created product")
            .await?;
        Ok(response.into_inner())
    }

    /// Partial update; fields left `None` are not sent.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id or
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the input.
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id]);
        let response: EntityResponse<Product> = self
            .send_json(Method::PUT, url, input, &format!("updated product {id}"))
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.endpoint(&["products", id])).await
    }

    /// `POST /products/bulk`. Partial failures are reported in the outcome.
    ///
    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the whole batch is rejected.
    pub async fn bulk_create_products(
        &self,
        payload: &BulkCreatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        let url = self.endpoint(&["products", "bulk"]);
        let response: BulkResponse = self
            .send_json(Method::POST, url, payload, "bulk create")
            .await?;
        Ok(response.into_outcome())
    }

    /// `PUT /products/bulk`. Partial failures are reported in the outcome.
    ///
    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the whole batch is rejected.
    pub async fn bulk_update_products(
        &self,
        payload: &BulkUpdatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        let url = self.endpoint(&["products", "bulk"]);
        let response: BulkResponse = self
            .send_json(Method::PUT, url, payload, "bulk update")
            .await?;
        Ok(response.into_outcome())
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET with retry, status check and JSON decoding.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ApiError> {
        retry_transient(&self.retry, || {
            let url = url.clone();
            async move {
                tracing::debug!(%url, "GET");
                let response = self.client.get(url.clone()).send().await?;
                let body = checked_body(response, &url).await?;
                decode(&body, context)
            }
        })
        .await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        context: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "sending JSON");
        let response = self
            .client
            .request(method, url.clone())
            .json(body)
            .send()
            .await?;
        let text = checked_body(response, &url).await?;
        decode(&text, context)
    }

    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        form: Form,
        context: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(%method, %url, "sending multipart");
        let response = self
            .client
            .request(method, url.clone())
            .multipart(form)
            .send()
            .await?;
        let text = checked_body(response, &url).await?;
        decode(&text, context)
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), ApiError> {
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url.clone()).send().await?;
        checked_body(response, &url).await?;
        Ok(())
    }
}

/// Maps 404 and other non-2xx statuses to errors, otherwise returns the body.
async fn checked_body(response: Response, url: &Url) -> Result<String, ApiError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }
    Ok(response.text().await?)
}

fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
