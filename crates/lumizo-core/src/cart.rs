//! Client-local shopping cart.
//!
//! The cart never reaches the backend. It is kept as a JSON file on disk so
//! successive CLI invocations see the same cart.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::CoreError;

/// Variant choices made when adding a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl VariantSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.color.is_none() && self.shape.is_none() && self.kind.is_none()
    }

    /// Human-readable summary, e.g. `"Size: 600x600, Color: Cool White"`.
    #[must_use]
    pub fn describe(&self) -> String {
        [
            ("Size", &self.size),
            ("Color", &self.color),
            ("Shape", &self.shape),
            ("Type", &self.kind),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {v}")))
        .collect::<Vec<_>>()
        .join(", ")
    }

    fn validate_against(&self, product: &Product) -> Result<(), CoreError> {
        for (kind, chosen, options) in [
            ("size", &self.size, &product.sizes),
            ("color", &self.color, &product.colors),
            ("shape", &self.shape, &product.shapes),
            ("type", &self.kind, &product.types),
        ] {
            if let Some(value) = chosen {
                if !options.iter().any(|o| o == value) {
                    return Err(CoreError::InvalidVariant {
                        product_id: product.id.clone(),
                        kind,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Snapshot taken when the item was added.
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub selection: VariantSelection,
}

impl CartItem {
    #[must_use]
    pub fn unit_price(&self) -> Option<Decimal> {
        self.product.active_price()
    }

    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price().map(|p| p * Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    /// Sum of line totals. Lines without a price contribute nothing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().filter_map(CartItem::line_total).sum()
    }

    /// Adds `quantity` units. A line with the same product and the same
    /// variant choices is topped up instead of duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroQuantity`] for a zero quantity and
    /// [`CoreError::InvalidVariant`] when a choice is not one the product offers.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        selection: VariantSelection,
    ) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::ZeroQuantity);
        }
        selection.validate_against(&product)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product.id && i.selection == selection)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return Ok(());
        }

        self.items.push(CartItem {
            product,
            quantity,
            selection,
        });
        Ok(())
    }

    /// Sets the quantity of line `index`; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CartIndex`] if `index` is out of range.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), CoreError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CoreError::CartIndex { index, len })?;
        if quantity == 0 {
            self.items.remove(index);
        } else {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Removes line `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CartIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<CartItem, CoreError> {
        if index >= self.items.len() {
            return Err(CoreError::CartIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Reads the cart file; a missing file is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CartIo`] or [`CoreError::CartParse`].
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CoreError::CartIo {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| CoreError::CartParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Writes the cart file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CartIo`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let io_err = |source| CoreError::CartIo {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| CoreError::CartParse {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }
}
