//! Mapping between the catalog location and the URL-mirrored filter fields.
//!
//! Only `search`, `tag` and `tagName` live in the URL. Other filters are
//! session state.

use url::form_urlencoded;

use crate::filter::FilterState;

/// Bare catalog path, the location after filters are cleared.
pub const CATALOG_PATH: &str = "/products";

/// Filter values read from a catalog location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSeed {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub tag_name: Option<String>,
}

/// Reads the mirrored parameters from a location.
///
/// Accepts a full path (`/products?search=led`), a bare query (`?tag=t1`) or
/// the query alone (`search=led`). Empty values count as absent.
#[must_use]
pub fn parse_location(location: &str) -> UrlSeed {
    let query = match location.split_once('?') {
        Some((_, query)) => query,
        None if location.contains('=') => location,
        None => "",
    };
    let query = query.split('#').next().unwrap_or_default();

    let mut seed = UrlSeed::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.trim().is_empty() {
            continue;
        }
        let value = Some(value.into_owned());
        match key.as_ref() {
            "search" => seed.search = value,
            "tag" => seed.tag = value,
            "tagName" => seed.tag_name = value,
            _ => {}
        }
    }
    seed
}

/// Renders the location for the current state. With nothing mirrored this
/// is the bare [`CATALOG_PATH`].
#[must_use]
pub fn render_location(state: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in [
        ("search", &state.search),
        ("tag", &state.tag),
        ("tagName", &state.tag_name),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{CATALOG_PATH}?{}", serializer.finish())
    } else {
        CATALOG_PATH.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterUpdate;

    #[test]
    fn parses_full_path() {
        let seed = parse_location("/products?search=led%20panel&tag=t1&tagName=Energy+Saver");
        assert_eq!(seed.search.as_deref(), Some("led panel"));
        assert_eq!(seed.tag.as_deref(), Some("t1"));
        assert_eq!(seed.tag_name.as_deref(), Some("Energy Saver"));
    }

    #[test]
    fn parses_bare_query() {
        assert_eq!(parse_location("?tag=t2").tag.as_deref(), Some("t2"));
        assert_eq!(parse_location("search=flood").search.as_deref(), Some("flood"));
    }

    #[test]
    fn bare_path_has_no_seed() {
        assert_eq!(parse_location(CATALOG_PATH), UrlSeed::default());
    }

    #[test]
    fn empty_values_and_unknown_keys_are_ignored() {
        let seed = parse_location("/products?search=&brand=b1#top");
        assert_eq!(seed, UrlSeed::default());
    }

    #[test]
    fn render_without_mirrored_fields_is_bare_path() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Category(Some("c1".to_owned())));
        assert_eq!(render_location(&state), "/products");
    }

    #[test]
    fn render_encodes_mirrored_fields() {
        let mut state = FilterState::default();
        state.update_filter(FilterUpdate::Search(Some("led panel".to_owned())));
        state.update_filter(FilterUpdate::Tag(Some("t1".to_owned())));
        assert_eq!(render_location(&state), "/products?search=led+panel&tag=t1");
    }
}
