//! Integration tests for `LumizoClient` using wiremock HTTP mocks.

use std::io::Write;

use lumizo_api::{ApiError, LumizoClient, RetryPolicy, UploadKind};
use lumizo_core::{
    BrandInput, BulkCreatePayload, BulkUpdatePayload, CategoryInput, ProductInput, ProductQuery,
    SortField, SortOrder, TagInput,
};
use rust_decimal::Decimal;
use wiremock::matchers::{
    body_json, body_string_contains, header_regex, method, path, path_regex, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> LumizoClient {
    LumizoClient::with_base_url(base_url, 30, "lumizo-test")
        .expect("client construction should not fail")
}

fn product_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "model": "PNL-600",
        "brand": { "_id": "b1", "name": "Philips" },
        "category": { "_id": "c1a", "name": "Panel Lights", "parent": "c1" },
        "price": 2499,
        "activePriceType": "price",
        "images": ["https://cdn.example.com/p1.png"],
        "createdAt": "2024-01-01T09:00:00Z"
    })
}

#[tokio::test]
async fn search_products_sends_query_and_parses_page() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "products": [product_json("p1", "LED Panel Light 600x600")],
        "pagination": { "currentPage": 2, "totalPages": 4, "totalProducts": 40, "limit": 12 }
    });

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "led"))
        .and(query_param("category", "c1"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "12"))
        .and(query_param("sortBy", "price"))
        .and(query_param("sortOrder", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = ProductQuery {
        search: Some("led".to_owned()),
        category: Some("c1".to_owned()),
        page: 2,
        sort_by: SortField::Price,
        sort_order: SortOrder::Asc,
        ..ProductQuery::default()
    };
    let page = client.search_products(&query).await.expect("should parse page");

    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].brand_id(), Some("b1"));
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total_products, 40);
}

#[tokio::test]
async fn search_products_accepts_legacy_bare_array() {
    let server = MockServer::start().await;
    let body = serde_json::json!([product_json("p1", "A"), product_json("p2", "B")]);

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .search_products(&ProductQuery::default())
        .await
        .expect("bare array should decode");
    assert_eq!(page.products.len(), 2);
    assert_eq!(page.pagination.total_pages, 1);
}

#[tokio::test]
async fn get_requests_retry_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "_id": "t1", "name": "Energy Saver" }])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(RetryPolicy::immediate(2));
    let tags = client.list_tags().await.expect("second attempt should succeed");
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(RetryPolicy::immediate(3));
    let err = client
        .create_tag(&TagInput {
            name: "Clearance".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus { status: 500, ref body, .. } if body == "boom"
    ));
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .get_product("nope")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).list_brands().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }));
}

#[tokio::test]
async fn create_and_update_product_send_camel_case_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(serde_json::json!({
            "name": "LED Panel Light 600x600",
            "price": "2499",
            "activePriceType": "price"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json("p1", "LED Panel Light 600x600")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/p1"))
        .and(body_json(serde_json::json!({ "isSpecial": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": product_json("p1", "LED Panel Light 600x600") })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let created = client
        .create_product(&ProductInput {
            name: Some("LED Panel Light 600x600".to_owned()),
            price: Some(Decimal::from(2499)),
            active_price_type: Some(lumizo_core::ActivePriceType::Price),
            ..ProductInput::default()
        })
        .await
        .expect("create should succeed");
    assert_eq!(created.id, "p1");

    let updated = client
        .update_product(
            "p1",
            &ProductInput {
                is_special: Some(true),
                ..ProductInput::default()
            },
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.name, "LED Panel Light 600x600");
}

#[tokio::test]
async fn bulk_update_puts_payload_and_reads_counts() {
    let server = MockServer::start().await;
    let mut updates = serde_json::Map::new();
    updates.insert("isSpecial".to_owned(), serde_json::Value::Bool(true));
    let payload = BulkUpdatePayload {
        product_ids: vec!["p1".to_owned(), "p2".to_owned()],
        updates,
    };

    Mock::given(method("PUT"))
        .and(path("/products/bulk"))
        .and(body_json(serde_json::json!({
            "productIds": ["p1", "p2"],
            "updates": { "isSpecial": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "done",
            "results": { "updated": 1, "failed": 1, "errors": ["p2: not found"] }
        })))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .bulk_update_products(&payload)
        .await
        .expect("bulk update should succeed");
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.errors, vec!["p2: not found"]);
}

#[tokio::test]
async fn bulk_create_posts_products_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products/bulk"))
        .and(body_string_contains("\"products\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "created": 2 })))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .bulk_create_products(&BulkCreatePayload {
            products: vec![
                serde_json::json!({ "name": "A" }),
                serde_json::json!({ "name": "B" }),
            ],
        })
        .await
        .expect("bulk create should succeed");
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn category_endpoints_cover_tree_and_subcategories() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "_id": "c1", "name": "Indoor Lighting", "children": [
                { "_id": "c1a", "name": "Panel Lights", "parent": "c1" }
            ]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories/c1/subcategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "_id": "c1a", "name": "Panel Lights", "parent": { "_id": "c1", "name": "Indoor Lighting" } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/categories/c9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "deleted" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/categories"))
        .and(body_json(serde_json::json!({ "name": "Solar", "parent": "c2" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "_id": "c4", "name": "Solar", "parent": "c2"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tree = client.category_tree().await.expect("tree should decode");
    assert_eq!(tree[0].children[0].category.id, "c1a");

    let subs = client.subcategories("c1").await.expect("subcategories should decode");
    assert_eq!(subs[0].parent_id(), Some("c1"));

    client.delete_category("c9").await.expect("delete should succeed");

    let created = client
        .create_category(&CategoryInput {
            name: Some("Solar".to_owned()),
            parent: Some("c2".to_owned()),
            description: None,
        })
        .await
        .expect("create should succeed");
    assert_eq!(created.parent_id(), Some("c2"));
}

#[tokio::test]
async fn brand_with_logo_is_sent_as_multipart() {
    let server = MockServer::start().await;
    let mut logo = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    logo.write_all(b"fake png bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/brands"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("name=\"image\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "_id": "b9", "name": "Syska", "image": "https://cdn.example.com/syska.png"
        })))
        .mount(&server)
        .await;

    let brand = test_client(&server.uri())
        .create_brand(
            &BrandInput {
                name: Some("Syska".to_owned()),
                image: None,
            },
            Some(logo.path()),
        )
        .await
        .expect("multipart create should succeed");
    assert_eq!(brand.image.as_deref(), Some("https://cdn.example.com/syska.png"));
}

#[tokio::test]
async fn upload_posts_file_field() {
    let server = MockServer::start().await;
    let mut sheet = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    sheet.write_all(b"%PDF-1.4").unwrap();

    Mock::given(method("POST"))
        .and(path("/upload/spec-sheet"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://cdn.example.com/sheet.pdf",
            "publicId": "lumizo/specs/sheet"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex("^/upload/lumizo"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let uploaded = client
        .upload(UploadKind::SpecSheet, sheet.path())
        .await
        .expect("upload should succeed");
    assert_eq!(uploaded.public_id.as_deref(), Some("lumizo/specs/sheet"));

    client
        .delete_upload("lumizo/specs/sheet")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn upload_of_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let err = test_client(&server.uri())
        .upload(UploadKind::ProductImage, std::path::Path::new("/nonexistent/x.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }));
}
