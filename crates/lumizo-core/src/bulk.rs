//! Admin bulk-edit wizards.
//!
//! Both wizards are linear. Bulk update walks three steps (products → fields
//! → values) and bulk create two (shared fields → rows); each ends in one
//! batch request body. Everything here is checked before any request is made.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::ActivePriceType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("select at least one product")]
    NoProductsSelected,

    #[error("select at least one field to update")]
    NoFieldsSelected,

    #[error("no value entered for {0}")]
    MissingValue(BulkField),

    #[error("{field} is not selected")]
    FieldNotSelected { field: BulkField },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: BulkField, reason: String },

    #[error("unknown field \"{0}\"")]
    UnknownField(String),

    #[error("add at least one product row")]
    NoRows,

    #[error("row {row} has no name")]
    UnnamedRow { row: usize },

    #[error("cannot {action} from the {step} step")]
    WrongStep {
        action: &'static str,
        step: &'static str,
    },
}

/// Product fields that can be set in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BulkField {
    Price,
    Mrp,
    DiscountedPrice,
    MinimumPrice,
    ActivePriceType,
    Category,
    Brand,
    Tags,
    Sizes,
    Colors,
    Shapes,
    Types,
    IsSpecial,
    Description,
}

impl BulkField {
    pub const ALL: [BulkField; 14] = [
        BulkField::Price,
        BulkField::Mrp,
        BulkField::DiscountedPrice,
        BulkField::MinimumPrice,
        BulkField::ActivePriceType,
        BulkField::Category,
        BulkField::Brand,
        BulkField::Tags,
        BulkField::Sizes,
        BulkField::Colors,
        BulkField::Shapes,
        BulkField::Types,
        BulkField::IsSpecial,
        BulkField::Description,
    ];

    /// JSON key on the product document.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            BulkField::Price => "price",
            BulkField::Mrp => "mrp",
            BulkField::DiscountedPrice => "discountedPrice",
            BulkField::MinimumPrice => "minimumPrice",
            BulkField::ActivePriceType => "activePriceType",
            BulkField::Category => "category",
            BulkField::Brand => "brand",
            BulkField::Tags => "tags",
            BulkField::Sizes => "sizes",
            BulkField::Colors => "colors",
            BulkField::Shapes => "shapes",
            BulkField::Types => "types",
            BulkField::IsSpecial => "isSpecial",
            BulkField::Description => "description",
        }
    }

    /// Parses raw form input into the JSON value sent for this field.
    ///
    /// Prices are non-negative decimals, list fields are comma-separated,
    /// `isSpecial` is a boolean, and `activePriceType` one of the price kinds.
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::InvalidValue`] when `raw` does not fit the field.
    pub fn parse_value(self, raw: &str) -> Result<Value, BulkError> {
        let raw = raw.trim();
        let invalid = |reason: String| BulkError::InvalidValue {
            field: self,
            reason,
        };
        match self {
            BulkField::Price
            | BulkField::Mrp
            | BulkField::DiscountedPrice
            | BulkField::MinimumPrice => {
                let amount: Decimal = raw
                    .parse()
                    .map_err(|e: rust_decimal::Error| invalid(e.to_string()))?;
                if amount.is_sign_negative() {
                    return Err(invalid("price cannot be negative".to_owned()));
                }
                serde_json::to_value(amount).map_err(|e| invalid(e.to_string()))
            }
            BulkField::ActivePriceType => {
                let kind: ActivePriceType = raw.parse().map_err(invalid)?;
                Ok(Value::String(kind.as_str().to_owned()))
            }
            BulkField::IsSpecial => match raw {
                "true" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "0" => Ok(Value::Bool(false)),
                other => Err(invalid(format!("\"{other}\" is not true/false"))),
            },
            BulkField::Tags
            | BulkField::Sizes
            | BulkField::Colors
            | BulkField::Shapes
            | BulkField::Types => Ok(Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_owned()))
                    .collect(),
            )),
            BulkField::Category | BulkField::Brand => {
                if raw.is_empty() {
                    return Err(invalid("an id is required".to_owned()));
                }
                Ok(Value::String(raw.to_owned()))
            }
            BulkField::Description => Ok(Value::String(raw.to_owned())),
        }
    }
}

impl std::fmt::Display for BulkField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BulkField {
    type Err = BulkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BulkField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| BulkError::UnknownField(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkUpdateStep {
    SelectProducts,
    SelectFields,
    InputValues,
}

impl BulkUpdateStep {
    fn name(self) -> &'static str {
        match self {
            BulkUpdateStep::SelectProducts => "select-products",
            BulkUpdateStep::SelectFields => "select-fields",
            BulkUpdateStep::InputValues => "input-values",
        }
    }
}

/// Request body for `PUT /products/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdatePayload {
    pub product_ids: Vec<String>,
    pub updates: Map<String, Value>,
}

/// Select products → select fields → input values → submit.
#[derive(Debug, Clone)]
pub struct BulkUpdateWizard {
    step: BulkUpdateStep,
    product_ids: BTreeSet<String>,
    fields: BTreeSet<BulkField>,
    values: BTreeMap<BulkField, Value>,
}

impl Default for BulkUpdateWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkUpdateWizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: BulkUpdateStep::SelectProducts,
            product_ids: BTreeSet::new(),
            fields: BTreeSet::new(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn step(&self) -> BulkUpdateStep {
        self.step
    }

    #[must_use]
    pub fn selected_products(&self) -> &BTreeSet<String> {
        &self.product_ids
    }

    #[must_use]
    pub fn selected_fields(&self) -> &BTreeSet<BulkField> {
        &self.fields
    }

    /// Flips selection of one product. Returns whether it is now selected.
    pub fn toggle_product(&mut self, id: &str) -> bool {
        if self.product_ids.remove(id) {
            false
        } else {
            self.product_ids.insert(id.to_owned());
            true
        }
    }

    pub fn select_products<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_ids.extend(ids.into_iter().map(Into::into));
    }

    /// Flips selection of one field. Deselecting drops its entered value.
    pub fn toggle_field(&mut self, field: BulkField) -> bool {
        if self.fields.remove(&field) {
            self.values.remove(&field);
            false
        } else {
            self.fields.insert(field);
            true
        }
    }

    /// Records the value for a selected field.
    ///
    /// # Errors
    ///
    /// [`BulkError::FieldNotSelected`] if `field` was not picked in step two;
    /// [`BulkError::InvalidValue`] if `raw` does not parse.
    pub fn set_value(&mut self, field: BulkField, raw: &str) -> Result<(), BulkError> {
        if !self.fields.contains(&field) {
            return Err(BulkError::FieldNotSelected { field });
        }
        let value = field.parse_value(raw)?;
        self.values.insert(field, value);
        Ok(())
    }

    /// Advances one step, validating the current one.
    ///
    /// # Errors
    ///
    /// [`BulkError::NoProductsSelected`] / [`BulkError::NoFieldsSelected`]
    /// when the current step is incomplete, or [`BulkError::WrongStep`] on
    /// the last step.
    pub fn next(&mut self) -> Result<BulkUpdateStep, BulkError> {
        self.step = match self.step {
            BulkUpdateStep::SelectProducts => {
                if self.product_ids.is_empty() {
                    return Err(BulkError::NoProductsSelected);
                }
                BulkUpdateStep::SelectFields
            }
            BulkUpdateStep::SelectFields => {
                if self.fields.is_empty() {
                    return Err(BulkError::NoFieldsSelected);
                }
                BulkUpdateStep::InputValues
            }
            BulkUpdateStep::InputValues => {
                return Err(BulkError::WrongStep {
                    action: "advance",
                    step: self.step.name(),
                })
            }
        };
        Ok(self.step)
    }

    /// Goes back one step; a no-op on the first step.
    pub fn back(&mut self) -> BulkUpdateStep {
        self.step = match self.step {
            BulkUpdateStep::SelectProducts | BulkUpdateStep::SelectFields => {
                BulkUpdateStep::SelectProducts
            }
            BulkUpdateStep::InputValues => BulkUpdateStep::SelectFields,
        };
        self.step
    }

    /// Builds the batch body. Checks every step regardless of the current
    /// one, so an empty field selection can never reach the API.
    ///
    /// # Errors
    ///
    /// [`BulkError::NoProductsSelected`], [`BulkError::NoFieldsSelected`] or
    /// [`BulkError::MissingValue`].
    pub fn build_payload(&self) -> Result<BulkUpdatePayload, BulkError> {
        if self.product_ids.is_empty() {
            return Err(BulkError::NoProductsSelected);
        }
        if self.fields.is_empty() {
            return Err(BulkError::NoFieldsSelected);
        }
        let mut updates = Map::new();
        for field in &self.fields {
            let value = self
                .values
                .get(field)
                .ok_or(BulkError::MissingValue(*field))?;
            updates.insert(field.key().to_owned(), value.clone());
        }
        Ok(BulkUpdatePayload {
            product_ids: self.product_ids.iter().cloned().collect(),
            updates,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkCreateStep {
    SharedFields,
    Rows,
}

/// One product row of a bulk create. Shared fields fill in whatever the row
/// leaves unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for `POST /products/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCreatePayload {
    pub products: Vec<Value>,
}

/// Shared fields → rows → submit.
#[derive(Debug, Clone)]
pub struct BulkCreateWizard {
    step: BulkCreateStep,
    shared: BTreeMap<BulkField, Value>,
    shared_images: Vec<String>,
    rows: Vec<NewProductRow>,
}

impl Default for BulkCreateWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkCreateWizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: BulkCreateStep::SharedFields,
            shared: BTreeMap::new(),
            shared_images: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn step(&self) -> BulkCreateStep {
        self.step
    }

    #[must_use]
    pub fn rows(&self) -> &[NewProductRow] {
        &self.rows
    }

    /// Sets a field applied to every row.
    ///
    /// # Errors
    ///
    /// [`BulkError::WrongStep`] once rows are being entered, or
    /// [`BulkError::InvalidValue`] if `raw` does not parse.
    pub fn set_shared(&mut self, field: BulkField, raw: &str) -> Result<(), BulkError> {
        if self.step != BulkCreateStep::SharedFields {
            return Err(BulkError::WrongStep {
                action: "set shared fields",
                step: "rows",
            });
        }
        let value = field.parse_value(raw)?;
        self.shared.insert(field, value);
        Ok(())
    }

    /// Image URLs given to every row that has none of its own.
    pub fn set_shared_images(&mut self, urls: Vec<String>) {
        self.shared_images = urls;
    }

    pub fn next(&mut self) -> BulkCreateStep {
        self.step = BulkCreateStep::Rows;
        self.step
    }

    pub fn back(&mut self) -> BulkCreateStep {
        self.step = BulkCreateStep::SharedFields;
        self.step
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// [`BulkError::WrongStep`] before the shared-fields step is finished.
    pub fn add_row(&mut self, row: NewProductRow) -> Result<(), BulkError> {
        if self.step != BulkCreateStep::Rows {
            return Err(BulkError::WrongStep {
                action: "add rows",
                step: "shared-fields",
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Merges shared fields into every row. Row values win.
    ///
    /// # Errors
    ///
    /// [`BulkError::NoRows`] or [`BulkError::UnnamedRow`].
    pub fn build_payload(&self) -> Result<BulkCreatePayload, BulkError> {
        if self.rows.is_empty() {
            return Err(BulkError::NoRows);
        }
        let mut products = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if row.name.trim().is_empty() {
                return Err(BulkError::UnnamedRow { row: i + 1 });
            }
            let mut object = match serde_json::to_value(row) {
                Ok(Value::Object(object)) => object,
                _ => Map::new(),
            };
            for (field, value) in &self.shared {
                object
                    .entry(field.key().to_owned())
                    .or_insert_with(|| value.clone());
            }
            if row.images.is_empty() && !self.shared_images.is_empty() {
                object.insert(
                    "images".to_owned(),
                    Value::from(self.shared_images.clone()),
                );
            }
            products.push(Value::Object(object));
        }
        Ok(BulkCreatePayload { products })
    }
}

/// Aggregate result of a batch request. Partial failures are reported, not
/// retried.
///
/// Decoding accepts the count under `succeeded`, `created`, `updated`,
/// `modifiedCount` or a numeric `success`. A boolean `success` flag is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBulkOutcome")]
pub struct BulkOutcome {
    pub succeeded: u64,
    pub failed: u64,
    pub errors: Vec<String>,
}

/// Either a count or a status flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum CountOrFlag {
    Count(u64),
    Flag(#[allow(dead_code)] bool),
}

impl CountOrFlag {
    fn count(self) -> Option<u64> {
        match self {
            CountOrFlag::Count(n) => Some(n),
            CountOrFlag::Flag(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBulkOutcome {
    succeeded: Option<u64>,
    created: Option<u64>,
    updated: Option<u64>,
    modified_count: Option<u64>,
    success: Option<CountOrFlag>,
    failed: Option<u64>,
    failed_count: Option<u64>,
    #[serde(default)]
    errors: Vec<String>,
}

impl From<RawBulkOutcome> for BulkOutcome {
    fn from(raw: RawBulkOutcome) -> Self {
        let succeeded = raw
            .succeeded
            .or(raw.created)
            .or(raw.updated)
            .or(raw.modified_count)
            .or_else(|| raw.success.and_then(CountOrFlag::count))
            .unwrap_or_default();
        Self {
            succeeded,
            failed: raw.failed.or(raw.failed_count).unwrap_or_default(),
            errors: raw.errors,
        }
    }
}

impl BulkOutcome {
    #[must_use]
    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("{} succeeded", self.succeeded)
        } else {
            format!("{} succeeded, {} failed", self.succeeded, self.failed)
        }
    }
}
