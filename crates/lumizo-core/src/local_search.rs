//! Client-side product search over the fallback dataset.
//!
//! This is the one filter algorithm used whenever the remote search is
//! unavailable. It approximates the server: case-insensitive substring
//! search over name, model and brand name; category matching that includes
//! direct subcategories; brand and tag equality; optional price range and
//! special-only; sorting; then page slicing.

use std::cmp::Ordering;

use crate::fallback::FallbackDataset;
use crate::filter::{ProductQuery, SortField, SortOrder};
use crate::models::{Pagination, Product, ProductPage};

/// Runs `query` against `dataset` and returns the requested page.
///
/// Pages below 1 and non-positive limits yield an empty page; the reported
/// pagination echoes the requested values uncorrected.
#[must_use]
pub fn search_products(dataset: &FallbackDataset, query: &ProductQuery) -> ProductPage {
    let tree = dataset.category_tree();
    let categories = query.category.as_deref().map(|c| tree.expand(c));
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut matched: Vec<&Product> = dataset
        .products
        .iter()
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| matches_search(dataset, p, n))
        })
        .filter(|p| {
            categories
                .as_ref()
                .is_none_or(|ids| p.category_id().is_some_and(|c| ids.contains(c)))
        })
        .filter(|p| {
            query
                .brand
                .as_deref()
                .is_none_or(|b| p.brand_id() == Some(b))
        })
        .filter(|p| query.tags.as_deref().is_none_or(|t| matches_tags(p, t)))
        .filter(|p| !query.special_only || p.is_special)
        .filter(|p| within_price_range(p, query))
        .collect();

    sort_products(&mut matched, query.sort_by, query.sort_order);

    let total = matched.len();
    let products = page_slice(&matched, query.page, query.limit)
        .iter()
        .map(|p| (*p).clone())
        .collect();

    ProductPage {
        products,
        pagination: Pagination {
            current_page: query.page,
            total_pages: total_pages(total, query.limit),
            total_products: i64::try_from(total).unwrap_or(i64::MAX),
            limit: query.limit,
        },
    }
}

fn matches_search(dataset: &FallbackDataset, product: &Product, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&product.name)
        || product.model.as_deref().is_some_and(contains)
        || dataset.product_brand_name(product).is_some_and(contains)
}

/// `tags` may be a comma-separated list; any listed tag matches.
fn matches_tags(product: &Product, tags: &str) -> bool {
    let mut wanted = tags.split(',').map(str::trim).filter(|t| !t.is_empty()).peekable();
    if wanted.peek().is_none() {
        return true;
    }
    wanted.any(|t| product.has_tag(t))
}

fn within_price_range(product: &Product, query: &ProductQuery) -> bool {
    if query.min_price.is_none() && query.max_price.is_none() {
        return true;
    }
    let Some(price) = product.active_price() else {
        return false;
    };
    query.min_price.is_none_or(|min| price >= min) && query.max_price.is_none_or(|max| price <= max)
}

/// Stable sort; products missing the sort key go last in either order.
fn sort_products(products: &mut [&Product], field: SortField, order: SortOrder) {
    products.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => Some(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortField::Price => compare_present(a.active_price(), b.active_price()),
            SortField::CreatedAt => compare_present(a.created_at, b.created_at),
        };
        match ordering {
            Some(o) if order == SortOrder::Desc => o.reverse(),
            Some(o) => o,
            None => missing_last(a, b, field),
        }
    });
}

/// `Some` when both values are present; `None` defers to [`missing_last`].
fn compare_present<T: Ord>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}

fn missing_last(a: &Product, b: &Product, field: SortField) -> Ordering {
    let present = |p: &Product| match field {
        SortField::Name => true,
        SortField::Price => p.active_price().is_some(),
        SortField::CreatedAt => p.created_at.is_some(),
    };
    // present sorts before missing
    present(b).cmp(&present(a))
}

fn page_slice<'a, T>(items: &'a [T], page: i64, limit: i64) -> &'a [T] {
    if page < 1 || limit < 1 {
        return &[];
    }
    let (Ok(page), Ok(limit)) = (usize::try_from(page), usize::try_from(limit)) else {
        return &[];
    };
    let start = (page - 1).saturating_mul(limit);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

fn total_pages(total: usize, limit: i64) -> i64 {
    let Ok(limit) = usize::try_from(limit) else {
        return 0;
    };
    if limit == 0 {
        return 0;
    }
    i64::try_from(total.div_ceil(limit)).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "local_search_test.rs"]
mod tests;
