//! Response envelopes of the Lumizo REST API.
//!
//! The backend is inconsistent about wrapping: product searches come back
//! either as a bare array (older deployments) or as `{ products, pagination }`,
//! and other lists either bare or as `{ data: [...] }`. The untagged enums
//! here accept every shape and normalise it.

use lumizo_core::{BulkOutcome, Category, Pagination, Product, ProductPage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductSearchResponse {
    Bare(Vec<Product>),
    Paged {
        products: Vec<Product>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
}

impl ProductSearchResponse {
    /// Bare arrays and pages without pagination get a synthesized
    /// single-page [`Pagination`].
    pub(crate) fn into_page(self) -> ProductPage {
        match self {
            ProductSearchResponse::Bare(products)
            | ProductSearchResponse::Paged {
                products,
                pagination: None,
            } => ProductPage {
                pagination: Pagination::single_page(products.len()),
                products,
            },
            ProductSearchResponse::Paged {
                products,
                pagination: Some(pagination),
            } => ProductPage {
                products,
                pagination,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { data: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EntityResponse<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> EntityResponse<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            EntityResponse::Wrapped { data } | EntityResponse::Bare(data) => data,
        }
    }
}

/// Batch endpoints answer either with the counts directly or nested under
/// `results`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BulkResponse {
    Nested { results: BulkOutcome },
    Flat(BulkOutcome),
}

impl BulkResponse {
    pub(crate) fn into_outcome(self) -> BulkOutcome {
        match self {
            BulkResponse::Nested { results } | BulkResponse::Flat(results) => results,
        }
    }
}

/// A node of `GET /categories/tree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default, alias = "subcategories")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Depth-first flattening, parents before children.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Category> {
        let mut out = vec![&self.category];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// Result of a file upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(alias = "secure_url", alias = "imageUrl", alias = "fileUrl")]
    pub url: String,
    #[serde(default, alias = "public_id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_product_array_gets_single_page() {
        let json = serde_json::json!([
            { "_id": "p1", "name": "A" },
            { "_id": "p2", "name": "B" }
        ]);
        let page = serde_json::from_value::<ProductSearchResponse>(json)
            .unwrap()
            .into_page();
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.total_products, 2);
    }

    #[test]
    fn paged_products_keep_server_pagination() {
        let json = serde_json::json!({
            "products": [{ "_id": "p1", "name": "A" }],
            "pagination": { "currentPage": 3, "totalPages": 5, "totalProducts": 49, "limit": 12 }
        });
        let page = serde_json::from_value::<ProductSearchResponse>(json)
            .unwrap()
            .into_page();
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.total_pages, 5);
    }

    #[test]
    fn list_accepts_data_wrapper() {
        let json = serde_json::json!({ "data": [{ "_id": "t1", "name": "Bestseller" }] });
        let tags = serde_json::from_value::<ListResponse<lumizo_core::Tag>>(json)
            .unwrap()
            .into_vec();
        assert_eq!(tags[0].name, "Bestseller");
    }

    #[test]
    fn bulk_outcome_nested_under_results() {
        let json = serde_json::json!({ "message": "ok", "results": { "success": 4, "failed": 0 } });
        let outcome = serde_json::from_value::<BulkResponse>(json)
            .unwrap()
            .into_outcome();
        assert_eq!(outcome.succeeded, 4);
    }

    #[test]
    fn bulk_outcome_ignores_boolean_success_flag() {
        let json = serde_json::json!({ "success": true, "updated": 2, "failed": 0 });
        let outcome = serde_json::from_value::<BulkResponse>(json)
            .unwrap()
            .into_outcome();
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn bulk_outcome_accepts_several_count_keys() {
        let json = serde_json::json!({ "created": 2, "success": 2 });
        let outcome = serde_json::from_value::<BulkResponse>(json)
            .unwrap()
            .into_outcome();
        assert_eq!(outcome.succeeded, 2);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn nested_bulk_outcome_with_status_flag() {
        let json = serde_json::json!({
            "success": true,
            "results": { "modifiedCount": 3, "failedCount": 1, "errors": ["p9: not found"] }
        });
        let outcome = serde_json::from_value::<BulkResponse>(json)
            .unwrap()
            .into_outcome();
        assert_eq!(outcome.summary(), "3 succeeded, 1 failed");
        assert_eq!(outcome.errors, vec!["p9: not found"]);
    }

    #[test]
    fn category_tree_nodes_flatten_depth_first() {
        let json = serde_json::json!({
            "_id": "c1", "name": "Indoor",
            "subcategories": [
                { "_id": "c1a", "name": "Panel", "children": [] },
                { "_id": "c1b", "name": "Down" }
            ]
        });
        let node: CategoryNode = serde_json::from_value(json).unwrap();
        let ids: Vec<&str> = node.flatten().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c1a", "c1b"]);
    }

    #[test]
    fn upload_accepts_cloudinary_field_names() {
        let json = serde_json::json!({ "secure_url": "https://cdn/x.png", "public_id": "lumizo/x" });
        let file: UploadedFile = serde_json::from_value(json).unwrap();
        assert_eq!(file.url, "https://cdn/x.png");
        assert_eq!(file.public_id.as_deref(), Some("lumizo/x"));
    }
}
