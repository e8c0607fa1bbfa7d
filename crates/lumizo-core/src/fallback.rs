//! Static catalog used when the API cannot be reached.
//!
//! The built-in dataset is a small lighting range covering every filter
//! dimension. Deployments can replace it with a YAML file of the same shape
//! (`products`, `categories`, `brands`, `tags`).

use std::collections::HashSet;
use std::path::Path;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category_tree::CategoryTree;
use crate::models::{ActivePriceType, Brand, Category, Entity, Product, Reference, Tag};
use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackDataset {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl FallbackDataset {
    #[must_use]
    pub fn category_tree(&self) -> CategoryTree {
        CategoryTree::new(&self.categories)
    }

    #[must_use]
    pub fn brand_name(&self, id: &str) -> Option<&str> {
        self.brands
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Brand display name for a product, resolving bare-id references
    /// against the dataset's brand list.
    #[must_use]
    pub fn product_brand_name<'a>(&'a self, product: &'a Product) -> Option<&'a str> {
        let brand = product.brand.as_ref()?;
        brand.name().or_else(|| self.brand_name(brand.id()))
    }

    /// The built-in dataset.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = vec![
            category("c1", "Indoor Lighting", None),
            category("c1a", "Panel Lights", Some("c1")),
            category("c1b", "Downlights", Some("c1")),
            category("c2", "Outdoor Lighting", None),
            category("c2a", "Flood Lights", Some("c2")),
            category("c3", "Decorative", None),
        ];
        let brands = vec![
            brand("b1", "Philips"),
            brand("b2", "Wipro"),
            brand("b3", "Havells"),
            brand("b4", "Ledvance"),
        ];
        let tags = vec![
            tag("t1", "Energy Saver"),
            tag("t2", "Bestseller"),
            tag("t3", "New Arrival"),
        ];

        let mut panel = product("p1", "LED Panel Light 600x600", "c1a", 2499, 1);
        panel.model = Some("PNL-600".to_owned());
        panel.brand = Some(Reference::Id("b1".to_owned()));
        panel.mrp = Some(Decimal::from(3199));
        panel.tags = tag_refs(&["t1", "t2"]);
        panel.sizes = strings(&["600x600"]);
        panel.colors = strings(&["Cool White", "Warm White"]);
        panel.shapes = strings(&["Square"]);
        panel.description = Some("Edge-lit 36W panel for false ceilings.".to_owned());

        let mut downlight = product("p2", "Slim Downlight 12W", "c1b", 899, 2);
        downlight.model = Some("DL-12W-LED".to_owned());
        downlight.brand = Some(Reference::Id("b2".to_owned()));
        downlight.mrp = Some(Decimal::from(1199));
        downlight.discounted_price = Some(Decimal::from(799));
        downlight.active_price_type = ActivePriceType::Discounted;
        downlight.tags = tag_refs(&["t1"]);
        downlight.sizes = strings(&["4 inch", "6 inch"]);
        downlight.colors = strings(&["Cool White", "Natural White", "Warm White"]);
        downlight.shapes = strings(&["Round", "Square"]);

        let mut flood = product("p3", "Flood Light 100W", "c2a", 3499, 3);
        flood.model = Some("FL-100".to_owned());
        flood.brand = Some(Reference::Id("b4".to_owned()));
        flood.tags = tag_refs(&["t3"]);
        flood.types = strings(&["IP65", "IP66"]);
        flood.is_special = true;

        let mut chandelier = product("p4", "Crystal Chandelier", "c3", 15999, 4);
        chandelier.model = Some("CH-8".to_owned());
        chandelier.brand = Some(Reference::Id("b3".to_owned()));
        chandelier.mrp = Some(Decimal::from(19999));
        chandelier.active_price_type = ActivePriceType::Mrp;
        chandelier.tags = tag_refs(&["t3"]);
        chandelier.is_special = true;

        let mut batten = product("p5", "Ceiling Batten 20W", "c1", 499, 5);
        batten.model = Some("BT-20".to_owned());
        batten.brand = Some(Reference::Id("b3".to_owned()));
        batten.tags = tag_refs(&["t2"]);
        batten.sizes = strings(&["2 ft", "4 ft"]);

        let mut bollard = product("p6", "Garden Bollard", "c2", 2199, 6);
        bollard.brand = Some(Reference::Id("b2".to_owned()));
        bollard.colors = strings(&["Black", "Grey"]);

        let mut track = product("p7", "Track Spotlight", "c1b", 1299, 7);
        track.model = Some("TR-SPOT".to_owned());
        track.brand = Some(Reference::Id("b1".to_owned()));
        track.minimum_price = Some(Decimal::from(1099));
        track.active_price_type = ActivePriceType::Minimum;
        track.types = strings(&["Single Circuit", "Three Circuit"]);

        let mut sconce = product("p8", "Wall Sconce Vintage", "c3", 1899, 8);
        sconce.model = Some("WS-V".to_owned());
        sconce.shapes = strings(&["Globe", "Cone"]);

        Self {
            products: vec![
                panel, downlight, flood, chandelier, batten, bollard, track, sconce,
            ],
            categories,
            brands,
            tags,
        }
    }

    /// Checks id uniqueness and that product references resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unique("product", self.products.iter().map(|p| p.id.as_str()))?;
        ensure_unique("category", self.categories.iter().map(|c| c.id.as_str()))?;
        ensure_unique("brand", self.brands.iter().map(|b| b.id.as_str()))?;
        ensure_unique("tag", self.tags.iter().map(|t| t.id.as_str()))?;

        let category_ids: HashSet<&str> = self.categories.iter().map(Entity::id).collect();
        let brand_ids: HashSet<&str> = self.brands.iter().map(Entity::id).collect();

        for category in &self.categories {
            if let Some(parent) = category.parent_id() {
                if !category_ids.contains(parent) {
                    return Err(ConfigError::Validation(format!(
                        "category '{}' has unknown parent '{parent}'",
                        category.id
                    )));
                }
            }
        }

        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "product '{}' has an empty name",
                    product.id
                )));
            }
            if let Some(category) = product.category_id() {
                if !category_ids.contains(category) {
                    return Err(ConfigError::Validation(format!(
                        "product '{}' references unknown category '{category}'",
                        product.id
                    )));
                }
            }
            if let Some(brand) = product.brand_id() {
                if !brand_ids.contains(brand) {
                    return Err(ConfigError::Validation(format!(
                        "product '{}' references unknown brand '{brand}'",
                        product.id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Load the fallback dataset: the YAML file at `path` when given, otherwise
/// the built-in one.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_fallback_dataset(path: Option<&Path>) -> Result<FallbackDataset, ConfigError> {
    let Some(path) = path else {
        return Ok(FallbackDataset::builtin());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DatasetIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let dataset: FallbackDataset = serde_yaml::from_str(&content)?;
    dataset.validate()?;

    tracing::debug!(
        path = %path.display(),
        products = dataset.products.len(),
        categories = dataset.categories.len(),
        "loaded fallback dataset"
    );
    Ok(dataset)
}

fn ensure_unique<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::Validation(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}

fn category(id: &str, name: &str, parent: Option<&str>) -> Category {
    Category {
        id: id.to_owned(),
        name: name.to_owned(),
        parent: parent.map(|p| Reference::Id(p.to_owned())),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

fn brand(id: &str, name: &str) -> Brand {
    Brand {
        id: id.to_owned(),
        name: name.to_owned(),
        image: None,
    }
}

fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_owned(),
        name: name.to_owned(),
    }
}

fn tag_refs(ids: &[&str]) -> Vec<Reference<Tag>> {
    ids.iter().map(|id| Reference::Id((*id).to_owned())).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// A bare product; `day` orders `createdAt` (higher is newer).
fn product(id: &str, name: &str, category: &str, price: i64, day: u32) -> Product {
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        model: None,
        description: None,
        brand: None,
        category: Some(Reference::Id(category.to_owned())),
        price: Some(Decimal::from(price)),
        mrp: None,
        discounted_price: None,
        minimum_price: None,
        active_price_type: ActivePriceType::Price,
        images: Vec::new(),
        tags: Vec::new(),
        sizes: Vec::new(),
        colors: Vec::new(),
        shapes: Vec::new(),
        types: Vec::new(),
        spec_sheet: None,
        is_special: false,
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).single(),
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_dataset_is_valid() {
        FallbackDataset::builtin().validate().unwrap();
    }

    #[test]
    fn builtin_tree_nests_panel_lights_under_indoor() {
        let tree = FallbackDataset::builtin().category_tree();
        assert_eq!(tree.parent("c1a"), Some("c1"));
        assert!(tree.expand("c1").contains("c1b"));
    }

    #[test]
    fn product_brand_name_resolves_bare_ids() {
        let dataset = FallbackDataset::builtin();
        let panel = dataset.product("p1").unwrap();
        assert_eq!(dataset.product_brand_name(panel), Some("Philips"));
        let sconce = dataset.product("p8").unwrap();
        assert!(dataset.product_brand_name(sconce).is_none());
    }

    #[test]
    fn validate_rejects_duplicate_product_ids() {
        let mut dataset = FallbackDataset::builtin();
        let dup = dataset.products[0].clone();
        dataset.products.push(dup);
        let err = dataset.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate product id 'p1'"), "{err}");
    }

    #[test]
    fn validate_rejects_unknown_category() {
        let mut dataset = FallbackDataset::builtin();
        dataset.products[0].category = Some(Reference::Id("nope".to_owned()));
        assert!(matches!(dataset.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_without_path_uses_builtin() {
        let dataset = load_fallback_dataset(None).unwrap();
        assert_eq!(dataset, FallbackDataset::builtin());
    }

    #[test]
    fn load_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
categories:
  - _id: k1
    name: Strips
brands:
  - _id: br1
    name: Syska
products:
  - _id: x1
    name: LED Strip 5m
    category: k1
    brand: br1
    price: 650
"#
        )
        .unwrap();
        let dataset = load_fallback_dataset(Some(file.path())).unwrap();
        assert_eq!(dataset.products.len(), 1);
        assert_eq!(dataset.products[0].brand_id(), Some("br1"));
        assert!(dataset.tags.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let result = load_fallback_dataset(Some(Path::new("/nonexistent/fallback.yaml")));
        assert!(matches!(result, Err(ConfigError::DatasetIo { .. })));
    }
}
