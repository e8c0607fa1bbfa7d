//! Parent/child index over a flat category list.
//!
//! Catalog data nests categories one level deep (e.g. "Indoor Lighting" →
//! "Panel Lights"). Filtering by a parent includes products filed under its
//! direct subcategories.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::Category;

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    names: BTreeMap<String, String>,
    parents: BTreeMap<String, String>,
    children: BTreeMap<String, Vec<String>>,
    order: Vec<String>,
}

impl CategoryTree {
    #[must_use]
    pub fn new(categories: &[Category]) -> Self {
        let mut tree = Self::default();
        for category in categories {
            tree.names
                .insert(category.id.clone(), category.name.clone());
            tree.order.push(category.id.clone());
            if let Some(parent) = category.parent_id().filter(|p| !p.is_empty()) {
                tree.parents
                    .insert(category.id.clone(), parent.to_owned());
                tree.children
                    .entry(parent.to_owned())
                    .or_default()
                    .push(category.id.clone());
            }
        }
        tree
    }

    /// Categories without a parent, in input order.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| !self.parents.contains_key(*id))
            .map(String::as_str)
            .collect()
    }

    /// Direct subcategories of `id`, in input order.
    #[must_use]
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// `id` plus its direct subcategories. Unknown ids expand to themselves.
    #[must_use]
    pub fn expand(&self, id: &str) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        ids.insert(id.to_owned());
        ids.extend(self.children(id).iter().cloned());
        ids
    }

    /// Display path such as `"Indoor Lighting / Panel Lights"`.
    #[must_use]
    pub fn path_name(&self, id: &str) -> Option<String> {
        let name = self.name(id)?;
        match self.parent(id).and_then(|p| self.name(p)) {
            Some(parent) => Some(format!("{parent} / {name}")),
            None => Some(name.to_owned()),
        }
    }
}
