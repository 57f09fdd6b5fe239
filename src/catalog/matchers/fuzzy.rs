use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::Matcher;

/// Accepts any haystack the wrapped fuzzy matcher produces a score for.
/// Scores are not used for ordering, results keep their catalog order.
pub struct FuzzyMatcher<T>(T);

impl FuzzyMatcher<SkimMatcherV2> {
    pub fn skim() -> Self {
        Self(SkimMatcherV2::default().ignore_case())
    }
}

impl<T> Matcher for FuzzyMatcher<T>
    where T: fuzzy_matcher::FuzzyMatcher + Send + Sync,
{
    fn matches(&self, query: &str, haystack: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.0.fuzzy_match(haystack, query).is_some()
    }
}
