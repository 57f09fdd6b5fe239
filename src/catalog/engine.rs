use crate::catalog::{
    CatalogItem, FacetCatalog, FacetDefinition, FilterState, MatchPredicate, Matcher, SimpleMatcher,
};

/// Filters item collections against a filter state.
pub struct FilterEngine {
    catalog: FacetCatalog,
    matcher: Box<dyn Matcher>,
}

impl FilterEngine {
    pub fn new(catalog: FacetCatalog, matcher: Box<dyn Matcher>) -> Self {
        Self { catalog, matcher }
    }

    pub fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    pub fn predicate(&self) -> MatchPredicate<'_> {
        MatchPredicate::new(&self.catalog, self.matcher.as_ref())
    }

    /// Returns the items matching `state`, in their original order.
    pub fn apply<'a>(&self, state: &FilterState, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        if state.is_identity() {
            return items.iter().collect();
        }

        let predicate = self.predicate();
        items.iter()
            .filter(|item| predicate.matches(state, item))
            .collect()
    }

    /// A copy of the catalog where each option's count is the number of
    /// items that option matches when selected on its own.
    pub fn count_options(&self, items: &[CatalogItem]) -> FacetCatalog {
        let mut catalog = self.catalog.clone();

        for FacetDefinition { id, comparison, options, .. } in catalog.facets_mut() {
            for option in options.iter_mut() {
                let count = items
                    .iter()
                    .filter_map(|item| item.attribute(id))
                    .filter(|attribute| comparison.matches(&option.value, attribute))
                    .count();

                option.count = Some(count);
            }
        }

        catalog
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(FacetCatalog::exercises(), Box::new(SimpleMatcher))
    }
}
