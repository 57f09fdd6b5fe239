use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::catalog::{FacetCatalog, FilterError};

/// The user's current selection: chosen option values per facet plus the free text query.
///
/// A facet key is present only while its selection is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    selections: BTreeMap<String, BTreeSet<String>>,
    query: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selections(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.selections
    }

    pub fn selected(&self, facet_id: &str) -> Option<&BTreeSet<String>> {
        self.selections.get(facet_id)
    }

    pub fn is_selected(&self, facet_id: &str, value: &str) -> bool {
        self.selected(facet_id).is_some_and(|values| values.contains(value))
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// True if neither a facet selection nor a query constrains the result.
    pub fn is_identity(&self) -> bool {
        self.selections.is_empty() && self.query.trim().is_empty()
    }

    /// Flips the selection of `value` within the facet after checking it against the catalog.
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, catalog: &FacetCatalog, facet_id: &str, value: &str) -> Result<bool, FilterError> {
        catalog.validate(facet_id, value)?;
        Ok(self.toggle_unchecked(facet_id, value))
    }

    fn toggle_unchecked(&mut self, facet_id: &str, value: &str) -> bool {
        let values = self.selections.entry(facet_id.to_owned()).or_default();

        if values.remove(value) {
            if values.is_empty() {
                self.selections.remove(facet_id);
            }

            false
        } else {
            values.insert(value.to_owned());
            true
        }
    }

    /// Drops every facet selection. The query is left as is.
    pub fn clear(&mut self) {
        self.selections.clear();
    }
}

/// A removable active filter, as shown above the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterChip<'a> {
    pub facet_id: &'a str,
    pub value: &'a str,
    pub label: &'a str,
}

pub fn active_filter_count(state: &FilterState) -> usize {
    state.selections.values().map(BTreeSet::len).sum()
}

/// Active selections in catalog declaration order.
pub fn active_chips<'a>(state: &FilterState, catalog: &'a FacetCatalog) -> Vec<FilterChip<'a>> {
    catalog
        .facets()
        .iter()
        .flat_map(|facet| {
            facet
                .options
                .iter()
                .filter(move |option| state.is_selected(&facet.id, &option.value))
                .map(move |option| FilterChip {
                    facet_id: &facet.id,
                    value: &option.value,
                    label: &option.label,
                })
        })
        .collect()
}
