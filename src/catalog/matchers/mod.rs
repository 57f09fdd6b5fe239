pub use fuzzy::FuzzyMatcher;
pub use simple::SimpleMatcher;

mod fuzzy;
mod simple;
