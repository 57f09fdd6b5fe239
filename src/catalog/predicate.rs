use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, FacetCatalog, FilterState, Matcher};

/// How a selected option value is compared against an item's attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Case-sensitive equality.
    Exact,
    /// Equality after lowercasing both sides.
    IgnoreCase,
    /// The selected value occurs somewhere in the attribute, ignoring case.
    /// Lets a broad option like "band" match "Resistance Band".
    Contains,
}

impl Comparison {
    pub fn matches(self, selected: &str, attribute: &str) -> bool {
        match self {
            Comparison::Exact => attribute == selected,
            Comparison::IgnoreCase => attribute.to_lowercase() == selected.to_lowercase(),
            Comparison::Contains => attribute.to_lowercase().contains(&selected.to_lowercase()),
        }
    }
}

/// Decides whether a single item satisfies a filter state.
///
/// Selections are OR-ed within a facet and AND-ed across facets. A non-blank
/// query is one more AND-ed constraint, checked against the item name.
#[derive(Clone, Copy)]
pub struct MatchPredicate<'a> {
    catalog: &'a FacetCatalog,
    matcher: &'a dyn Matcher,
}

impl<'a> MatchPredicate<'a> {
    pub fn new(catalog: &'a FacetCatalog, matcher: &'a dyn Matcher) -> Self {
        Self { catalog, matcher }
    }

    pub fn matches(&self, state: &FilterState, item: &CatalogItem) -> bool {
        let facets_match = state
            .selections()
            .iter()
            .all(|(facet_id, selected)| self.facet_matches(facet_id, selected, item));

        facets_match && self.query_matches(state.query(), item)
    }

    fn facet_matches(&self, facet_id: &str, selected: &BTreeSet<String>, item: &CatalogItem) -> bool {
        // facets the catalog does not define never constrain anything
        let Some(facet) = self.catalog.facet(facet_id) else {
            return true;
        };

        let Some(attribute) = item.attribute(facet_id) else {
            return false;
        };

        selected.iter().any(|value| facet.comparison.matches(value, attribute))
    }

    fn query_matches(&self, query: &str, item: &CatalogItem) -> bool {
        query.trim().is_empty() || self.matcher.matches(query, &item.haystack)
    }
}
