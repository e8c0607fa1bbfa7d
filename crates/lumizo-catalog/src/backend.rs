//! Seams between the session logic and the REST client.

use std::path::Path;

use lumizo_api::{ApiError, LumizoClient, UploadKind, UploadedFile};
use lumizo_core::{
    Brand, BulkCreatePayload, BulkOutcome, BulkUpdatePayload, Category, Product, ProductPage,
    ProductQuery, Tag,
};

/// Read side used by [`crate::CatalogSession`].
#[allow(async_fn_in_trait)]
pub trait CatalogBackend {
    async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError>;
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn list_brands(&self) -> Result<Vec<Brand>, ApiError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
}

/// Write side used by the admin flows.
#[allow(async_fn_in_trait)]
pub trait AdminBackend {
    async fn bulk_update_products(
        &self,
        payload: &BulkUpdatePayload,
    ) -> Result<BulkOutcome, ApiError>;
    async fn bulk_create_products(
        &self,
        payload: &BulkCreatePayload,
    ) -> Result<BulkOutcome, ApiError>;
    async fn upload(&self, kind: UploadKind, path: &Path) -> Result<UploadedFile, ApiError>;
}

impl CatalogBackend for LumizoClient {
    async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        LumizoClient::search_products(self, query).await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        LumizoClient::get_product(self, id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        LumizoClient::list_categories(self).await
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, ApiError> {
        LumizoClient::list_brands(self).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        LumizoClient::list_tags(self).await
    }
}

impl AdminBackend for LumizoClient {
    async fn bulk_update_products(
        &self,
        payload: &BulkUpdatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        LumizoClient::bulk_update_products(self, payload).await
    }

    async fn bulk_create_products(
        &self,
        payload: &BulkCreatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        LumizoClient::bulk_create_products(self, payload).await
    }

    async fn upload(&self, kind: UploadKind, path: &Path) -> Result<UploadedFile, ApiError> {
        LumizoClient::upload(self, kind, path).await
    }
}
