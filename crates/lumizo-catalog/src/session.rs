//! Catalog session: filter store, fetch orchestrator and URL synchronizer.
//!
//! Every filter change that alters the state triggers a product search.
//! A failed search never surfaces as an error: the session logs a warning,
//! records a [`Notice`] and serves the local filter over the fallback
//! dataset instead.
//!
//! Each search takes a [`FetchTicket`]. Completions carrying a ticket older
//! than the latest one issued are dropped, so a slow response can never
//! overwrite the result of a newer request.

use lumizo_api::ApiError;
use lumizo_core::{
    parse_location, render_location, search_products, Brand, Category, CategoryTree,
    FallbackDataset, FilterState, FilterUpdate, Pagination, Product, ProductPage, ProductQuery,
    Tag, CATALOG_PATH,
};

use crate::backend::CatalogBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Handle for one in-flight product search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    query: ProductQuery,
}

impl FetchTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn query(&self) -> &ProductQuery {
        &self.query
    }
}

pub struct CatalogSession<B> {
    backend: B,
    dataset: FallbackDataset,
    filters: FilterState,
    products: Vec<Product>,
    pagination: Pagination,
    source: DataSource,
    notice: Option<Notice>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
    tags: Vec<Tag>,
    issued: u64,
}

impl<B: CatalogBackend> CatalogSession<B> {
    pub fn new(backend: B, dataset: FallbackDataset, page_limit: i64) -> Self {
        Self {
            backend,
            dataset,
            filters: FilterState::with_limit(page_limit),
            products: Vec::new(),
            pagination: Pagination::single_page(0),
            source: DataSource::Remote,
            notice: None,
            categories: Vec::new(),
            brands: Vec::new(),
            tags: Vec::new(),
            issued: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns and clears the pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn category_tree(&self) -> CategoryTree {
        CategoryTree::new(&self.categories)
    }

    /// Seeds filters from `location`, then loads facets and the first page.
    pub async fn start(&mut self, location: &str) {
        self.filters.apply_url_seed(&parse_location(location));
        self.load_facets().await;
        self.refresh().await;
    }

    /// Applies a navigation. Only re-fetches when a mirrored field changed.
    pub async fn navigate(&mut self, location: &str) -> bool {
        let changed = self.filters.apply_url_seed(&parse_location(location));
        if changed {
            self.refresh().await;
        }
        changed
    }

    /// Changes one filter field and re-fetches when the state changed.
    pub async fn set_filter(&mut self, update: FilterUpdate) -> bool {
        let changed = self.filters.update_filter(update);
        if changed {
            self.refresh().await;
        }
        changed
    }

    /// Applies several changes in order with a single re-fetch. Pagination
    /// updates should come last, since any other change resets the page.
    pub async fn apply_filters<I>(&mut self, updates: I) -> bool
    where
        I: IntoIterator<Item = FilterUpdate>,
    {
        let mut changed = false;
        for update in updates {
            changed |= self.filters.update_filter(update);
        }
        if changed {
            self.refresh().await;
        }
        changed
    }

    /// Resets every filter, re-fetches, and returns the new location
    /// (always the bare catalog path).
    pub async fn clear_filters(&mut self) -> String {
        self.filters.clear();
        self.refresh().await;
        CATALOG_PATH.to_owned()
    }

    /// The location mirroring the current filters.
    pub fn location(&self) -> String {
        render_location(&self.filters)
    }

    /// Runs one search for the current filters.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.backend.search_products(ticket.query()).await;
        self.complete_fetch(&ticket, result);
    }

    /// Issues a ticket for the current filters. Issuing a ticket makes every
    /// earlier ticket stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            id: self.issued,
            query: self.filters.to_query(),
        }
    }

    /// Applies the result of the fetch behind `ticket`.
    ///
    /// Returns `false` when the ticket is stale and the result was dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ProductPage, ApiError>,
    ) -> bool {
        if ticket.id < self.issued {
            tracing::debug!(
                ticket = ticket.id,
                latest = self.issued,
                "dropping stale product search result"
            );
            return false;
        }

        let page = match result {
            Ok(page) => {
                self.source = DataSource::Remote;
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| n.level == NoticeLevel::Warning)
                {
                    tracing::info!("catalog service recovered, clearing outage notice");
                    self.notice = None;
                }
                page
            }
            Err(err) => {
                tracing::warn!(error = %err, "product search failed, using fallback dataset");
                self.source = DataSource::Fallback;
                self.notice = Some(Notice::warning(format!(
                    "Catalog service unavailable ({err}); showing sample products."
                )));
                search_products(&self.dataset, &ticket.query)
            }
        };
        self.products = page.products;
        self.pagination = page.pagination;
        true
    }

    /// Loads categories, brands and tags. Each list falls back to the
    /// dataset on its own.
    pub async fn load_facets(&mut self) {
        let mut failed = Vec::new();

        match self.backend.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load categories, using fallback");
                self.categories = self.dataset.categories.clone();
                failed.push("categories");
            }
        }
        match self.backend.list_brands().await {
            Ok(brands) => self.brands = brands,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load brands, using fallback");
                self.brands = self.dataset.brands.clone();
                failed.push("brands");
            }
        }
        match self.backend.list_tags().await {
            Ok(tags) => self.tags = tags,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load tags, using fallback");
                self.tags = self.dataset.tags.clone();
                failed.push("tags");
            }
        }

        if !failed.is_empty() && self.notice.is_none() {
            self.notice = Some(Notice::info(format!(
                "Showing sample {}.",
                failed.join(", ")
            )));
        }
    }

    /// Fetches one product, falling back to the dataset. `None` when neither
    /// knows the id.
    pub async fn product(&mut self, id: &str) -> Option<Product> {
        match self.backend.get_product(id).await {
            Ok(product) => Some(product),
            Err(ApiError::NotFound { .. }) => None,
            Err(err) => {
                tracing::warn!(error = %err, product_id = id, "failed to load product, trying fallback");
                let product = self.dataset.product(id).cloned();
                if product.is_some() {
                    self.notice = Some(Notice::warning(
                        "Catalog service unavailable; showing sample product.",
                    ));
                }
                product
            }
        }
    }

    /// Display name for a brand id, from the loaded brands or the dataset.
    pub fn brand_name(&self, id: &str) -> Option<&str> {
        self.brands
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
            .or_else(|| self.dataset.brand_name(id))
    }

    /// Display name for a category id, from the loaded categories or the dataset.
    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .chain(&self.dataset.categories)
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}
