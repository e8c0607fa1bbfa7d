pub mod app_config;
pub mod bulk;
pub mod cart;
pub mod category_tree;
pub mod config;
pub mod fallback;
pub mod filter;
pub mod local_search;
pub mod models;
pub mod pricing;
pub mod url_sync;

pub use app_config::{AppConfig, Environment};
pub use bulk::{
    BulkCreatePayload, BulkCreateStep, BulkCreateWizard, BulkError, BulkField, BulkOutcome,
    BulkUpdatePayload, BulkUpdateStep, BulkUpdateWizard, NewProductRow,
};
pub use cart::{Cart, CartItem, VariantSelection};
pub use category_tree::CategoryTree;
pub use config::{load_app_config, load_app_config_from_env};
pub use fallback::{load_fallback_dataset, FallbackDataset};
pub use filter::{FilterKey, FilterState, FilterUpdate, ProductQuery, SortField, SortOrder};
pub use local_search::search_products;
pub use models::{
    ActivePriceType, Brand, BrandInput, Category, CategoryInput, Entity, EntitySummary,
    Pagination, Product, ProductInput, ProductPage, Reference, Tag, TagInput,
};
pub use url_sync::{parse_location, render_location, UrlSeed, CATALOG_PATH};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read fallback dataset at {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fallback dataset: {0}")]
    DatasetParse(#[from] serde_yaml::Error),

    #[error("fallback dataset validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("product {product_id} has no {kind} option \"{value}\"")]
    InvalidVariant {
        product_id: String,
        kind: &'static str,
        value: String,
    },

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("cart item index {index} is out of range (cart has {len} items)")]
    CartIndex { index: usize, len: usize },

    #[error("failed to access cart file {path}: {source}")]
    CartIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cart file {path} is not valid JSON: {source}")]
    CartParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
