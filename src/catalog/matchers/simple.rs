use itertools::Itertools;
use crate::catalog::Matcher;

/// Every whitespace separated part of the query must occur in the haystack.
pub struct SimpleMatcher;

impl Matcher for SimpleMatcher {
    fn matches(&self, query: &str, haystack: &str) -> bool {
        let query = query.to_lowercase();
        let query_parts = query.split_whitespace().collect_vec();

        query_parts
            .iter()
            .all(|part| haystack.contains(part))
    }
}
