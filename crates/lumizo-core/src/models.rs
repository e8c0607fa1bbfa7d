//! Catalog records as the Lumizo API returns them.
//!
//! The backend is Mongo-backed: identifiers travel as `_id` and field names
//! are camelCase. A product's brand, category and tags may be populated
//! objects or bare id strings depending on the endpoint; [`Reference`]
//! accepts both.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Anything with an id and a display name.
pub trait Entity {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A link to another record: either the populated object or its bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Populated(T),
    Id(String),
}

impl<T: Entity> Reference<T> {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Reference::Populated(entity) => entity.id(),
            Reference::Id(id) => id,
        }
    }

    /// Display name, available only when the reference was populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Populated(entity) => Some(entity.name()),
            Reference::Id(_) => None,
        }
    }
}

/// Minimal `{ _id, name }` shape used for populated parent categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Entity for EntitySummary {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Which stored price field is shown to customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivePriceType {
    #[default]
    Price,
    Mrp,
    #[serde(alias = "discountedPrice")]
    Discounted,
    #[serde(alias = "minimumPrice")]
    Minimum,
}

impl ActivePriceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivePriceType::Price => "price",
            ActivePriceType::Mrp => "mrp",
            ActivePriceType::Discounted => "discounted",
            ActivePriceType::Minimum => "minimum",
        }
    }
}

impl std::fmt::Display for ActivePriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivePriceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(ActivePriceType::Price),
            "mrp" => Ok(ActivePriceType::Mrp),
            "discounted" | "discountedPrice" => Ok(ActivePriceType::Discounted),
            "minimum" | "minimumPrice" => Ok(ActivePriceType::Minimum),
            other => Err(format!(
                "unknown price type \"{other}\" (expected price, mrp, discounted or minimum)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Manufacturer model code, e.g. `"PNL-600"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Reference<Brand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Reference<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_price: Option<Decimal>,
    #[serde(default)]
    pub active_price_type: ActivePriceType,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Reference<Tag>>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub shapes: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_sheet: Option<String>,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// First image URL, used as the thumbnail in listings and exports.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn brand_id(&self) -> Option<&str> {
        self.brand.as_ref().map(Reference::id)
    }

    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(Reference::id)
    }

    #[must_use]
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t.id() == tag_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Reference<EntitySummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().map(Reference::id)
    }
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Entity for Brand {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Entity for Tag {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(alias = "page")]
    pub current_page: i64,
    pub total_pages: i64,
    #[serde(alias = "total")]
    pub total_products: i64,
    #[serde(default)]
    pub limit: i64,
}

impl Pagination {
    /// Pagination for a result set that fits on a single page.
    #[must_use]
    pub fn single_page(total: usize) -> Self {
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        Self {
            current_page: 1,
            total_pages: i64::from(total > 0),
            total_products: total,
            limit: total,
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of a product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Create/update body for a product. Unset fields are omitted, so the same
/// type serves partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_price_type: Option<ActivePriceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_sheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_special: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent category id. `Some("")` detaches the category from its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Logo URL, when the image was uploaded separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInput {
    pub name: String,
}
