use std::sync::Arc;

use itertools::Itertools;

pub use builtin::BuiltinExercises;
pub use json::JsonFile;

use crate::catalog::{CatalogItem, SourceError};

mod builtin;
mod json;

pub trait ItemSource: Send + Sync {
    fn title(&self) -> String {
        "Unknown".into()
    }

    /// Loads all items that this source can provide, in source order.
    fn load(&self) -> Result<Vec<CatalogItem>, SourceError>;
}

/// Loads every source in parallel and concatenates the items in source order.
pub fn load_items(sources: &[Arc<dyn ItemSource>]) -> Result<Vec<CatalogItem>, SourceError> {
    use rayon::prelude::*;

    let items: Vec<_> = sources.par_iter()
        .map(|source| {
            let result = source.load();
            if let Ok(items) = &result {
                log::debug!("loaded {} items from {}", items.len(), source.title());
            }

            result
        })
        .collect();

    let items: Vec<CatalogItem> = items.into_iter()
        .flatten_ok()
        .try_collect()?;

    let duplicates = items.iter()
        .map(|item| item.id.as_str())
        .duplicates()
        .collect_vec();

    if !duplicates.is_empty() {
        log::warn!("duplicate item ids in catalog: {}", duplicates.join(", "));
    }

    Ok(items)
}
