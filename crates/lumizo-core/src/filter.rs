//! Catalog filter state and the product search query derived from it.
//!
//! [`FilterState::update_filter`] is the single mutation point: changing any
//! field other than `page` or `limit` sends the user back to page 1. Values
//! are stored exactly as given; a negative page is kept as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::url_sync::UrlSeed;

pub const DEFAULT_LIMIT: i64 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "price")]
    Price,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::CreatedAt => "createdAt",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            "createdAt" | "created_at" | "newest" => Ok(SortField::CreatedAt),
            other => Err(format!(
                "unknown sort field \"{other}\" (expected name, price or createdAt)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order \"{other}\" (expected asc or desc)")),
        }
    }
}

/// Identifies one filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Search,
    Category,
    Brand,
    Tag,
    TagName,
    SortBy,
    SortOrder,
    Page,
    Limit,
}

impl FilterKey {
    /// `true` for the pagination keys that do not reset the page.
    #[must_use]
    pub fn is_pagination(self) -> bool {
        matches!(self, FilterKey::Page | FilterKey::Limit)
    }
}

/// A single-field change to a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(Option<String>),
    Category(Option<String>),
    Brand(Option<String>),
    Tag(Option<String>),
    /// Display name of the selected tag, mirrored from the URL.
    TagName(Option<String>),
    SortBy(SortField),
    SortOrder(SortOrder),
    Page(i64),
    Limit(i64),
}

impl FilterUpdate {
    #[must_use]
    pub fn key(&self) -> FilterKey {
        match self {
            FilterUpdate::Search(_) => FilterKey::Search,
            FilterUpdate::Category(_) => FilterKey::Category,
            FilterUpdate::Brand(_) => FilterKey::Brand,
            FilterUpdate::Tag(_) => FilterKey::Tag,
            FilterUpdate::TagName(_) => FilterKey::TagName,
            FilterUpdate::SortBy(_) => FilterKey::SortBy,
            FilterUpdate::SortOrder(_) => FilterKey::SortOrder,
            FilterUpdate::Page(_) => FilterKey::Page,
            FilterUpdate::Limit(_) => FilterKey::Limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub tag: Option<String>,
    pub tag_name: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl FilterState {
    #[must_use]
    pub fn with_limit(limit: i64) -> Self {
        Self {
            search: None,
            category: None,
            brand: None,
            tag: None,
            tag_name: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit,
        }
    }

    /// Applies one field change. Any key other than `page`/`limit` also
    /// resets `page` to 1.
    ///
    /// Returns `true` when the state differs from before the call.
    pub fn update_filter(&mut self, update: FilterUpdate) -> bool {
        let before = self.clone();
        let key = update.key();
        match update {
            FilterUpdate::Search(v) => self.search = v,
            FilterUpdate::Category(v) => self.category = v,
            FilterUpdate::Brand(v) => self.brand = v,
            FilterUpdate::Tag(v) => self.tag = v,
            FilterUpdate::TagName(v) => self.tag_name = v,
            FilterUpdate::SortBy(v) => self.sort_by = v,
            FilterUpdate::SortOrder(v) => self.sort_order = v,
            FilterUpdate::Page(v) => self.page = v,
            FilterUpdate::Limit(v) => self.limit = v,
        }
        if !key.is_pagination() {
            self.page = 1;
        }
        *self != before
    }

    /// Seeds the URL-mirrored fields (`search`, `tag`, `tagName`).
    ///
    /// A parameter missing from the URL clears its field. Fields whose value
    /// already matches are left alone so a no-op navigation keeps the page.
    pub fn apply_url_seed(&mut self, seed: &UrlSeed) -> bool {
        let mut changed = false;
        if self.search != seed.search {
            changed |= self.update_filter(FilterUpdate::Search(seed.search.clone()));
        }
        if self.tag != seed.tag {
            changed |= self.update_filter(FilterUpdate::Tag(seed.tag.clone()));
        }
        if self.tag_name != seed.tag_name {
            changed |= self.update_filter(FilterUpdate::TagName(seed.tag_name.clone()));
        }
        changed
    }

    /// Resets every field, keeping the configured page size.
    pub fn clear(&mut self) {
        *self = Self::with_limit(self.limit);
    }

    /// `true` when any narrowing filter is set.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        [&self.search, &self.category, &self.brand, &self.tag]
            .into_iter()
            .any(|f| non_empty(f.as_deref()).is_some())
    }

    /// The search request for the current state.
    #[must_use]
    pub fn to_query(&self) -> ProductQuery {
        ProductQuery {
            search: non_empty(self.search.as_deref()).map(str::to_owned),
            category: non_empty(self.category.as_deref()).map(str::to_owned),
            brand: non_empty(self.brand.as_deref()).map(str::to_owned),
            tags: non_empty(self.tag.as_deref()).map(str::to_owned),
            min_price: None,
            max_price: None,
            special_only: false,
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parameters of a paginated product search, shared by the remote request
/// and the local fallback filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Tag id. The API accepts a comma-separated list; the catalog sends one.
    pub tags: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub special_only: bool,
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        FilterState::default().to_query()
    }
}

impl ProductQuery {
    /// Query-string pairs for `GET /products`, unset fields omitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(brand) = &self.brand {
            pairs.push(("brand", brand.clone()));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if self.special_only {
            pairs.push(("special", "true".to_owned()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("sortBy", self.sort_by.as_str().to_owned()));
        pairs.push(("sortOrder", self.sort_order.as_str().to_owned()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_first_page_newest_first() {
        let state = FilterState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, DEFAULT_LIMIT);
        assert_eq!(state.sort_by, SortField::CreatedAt);
        assert_eq!(state.sort_order, SortOrder::Desc);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn non_pagination_updates_reset_page() {
        let updates = [
            FilterUpdate::Search(Some("led".to_owned())),
            FilterUpdate::Category(Some("c1".to_owned())),
            FilterUpdate::Brand(Some("b1".to_owned())),
            FilterUpdate::Tag(Some("t1".to_owned())),
            FilterUpdate::TagName(Some("Bestseller".to_owned())),
            FilterUpdate::SortBy(SortField::Price),
            FilterUpdate::SortOrder(SortOrder::Asc),
        ];
        for update in updates {
            let mut state = FilterState {
                page: 4,
                ..FilterState::default()
            };
            let key = update.key();
            state.update_filter(update);
            assert_eq!(state.page, 1, "{key:?} should reset page");
        }
    }

    #[test]
    fn page_update_keeps_other_fields() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Search(Some("panel".to_owned())));
        assert!(state.update_filter(FilterUpdate::Page(3)));
        assert_eq!(state.page, 3);
        assert_eq!(state.search.as_deref(), Some("panel"));
    }

    #[test]
    fn limit_update_does_not_reset_page() {
        let mut state = FilterState {
            page: 2,
            ..FilterState::default()
        };
        state.update_filter(FilterUpdate::Limit(24));
        assert_eq!(state.page, 2);
        assert_eq!(state.limit, 24);
    }

    #[test]
    fn negative_page_is_passed_through() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Page(-2));
        assert_eq!(state.page, -2);
        assert_eq!(state.to_query().page, -2);
    }

    #[test]
    fn update_reports_no_change_for_same_value_on_first_page() {
        let mut state = FilterState::default();
        assert!(!state.update_filter(FilterUpdate::Search(None)));
    }

    #[test]
    fn url_seed_clears_missing_fields() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Search(Some("panel".to_owned())));
        state.update_filter(FilterUpdate::Tag(Some("t1".to_owned())));
        state.update_filter(FilterUpdate::Category(Some("c1".to_owned())));
        let changed = state.apply_url_seed(&UrlSeed {
            search: Some("flood".to_owned()),
            tag: None,
            tag_name: None,
        });
        assert!(changed);
        assert_eq!(state.search.as_deref(), Some("flood"));
        assert!(state.tag.is_none());
        // Category is not mirrored in the URL.
        assert_eq!(state.category.as_deref(), Some("c1"));
    }

    #[test]
    fn identical_url_seed_keeps_page() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Search(Some("panel".to_owned())));
        state.update_filter(FilterUpdate::Page(3));
        let changed = state.apply_url_seed(&UrlSeed {
            search: Some("panel".to_owned()),
            tag: None,
            tag_name: None,
        });
        assert!(!changed);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn clear_keeps_limit() {
        let mut state = FilterState::with_limit(30);
        state.update_filter(FilterUpdate::Brand(Some("b2".to_owned())));
        state.clear();
        assert_eq!(state, FilterState::with_limit(30));
    }

    #[test]
    fn to_query_omits_blank_fields() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Search(Some("  ".to_owned())));
        state.update_filter(FilterUpdate::Brand(Some("b1".to_owned())));
        let query = state.to_query();
        assert!(query.search.is_none());
        assert_eq!(query.brand.as_deref(), Some("b1"));
    }

    #[test]
    fn to_pairs_includes_pagination_and_sort() {
        let mut query = FilterState::default().to_query();
        query.search = Some("led".to_owned());
        query.special_only = true;
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("search", "led".to_owned()),
                ("special", "true".to_owned()),
                ("page", "1".to_owned()),
                ("limit", "12".to_owned()),
                ("sortBy", "createdAt".to_owned()),
                ("sortOrder", "desc".to_owned()),
            ]
        );
    }
}
