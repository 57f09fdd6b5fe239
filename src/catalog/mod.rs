use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use controller::*;
pub use engine::*;
pub use error::*;
pub use facets::*;
pub use matchers::*;
pub use predicate::*;
pub use sources::*;
pub use state::*;

mod controller;
mod engine;
mod error;
mod facets;
mod matchers;
mod predicate;
mod sources;
mod state;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: String,

    /// The name will be used to display the item in the UI.
    pub name: String,

    /// One value per facet dimension, keyed by facet id.
    pub attributes: BTreeMap<String, String>,

    pub duration_minutes: u32,

    pub image_url: Option<String>,

    /// Lowercase version of the name, used for free text queries.
    #[serde(skip)]
    pub haystack: String,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_minutes: u32) -> Self {
        let name = name.into();

        Self {
            id: id.into(),
            haystack: name.to_lowercase(),
            name,
            attributes: BTreeMap::new(),
            duration_minutes,
            image_url: None,
        }
    }

    pub fn with_attribute(mut self, facet_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(facet_id.into(), value.into());
        self
    }

    /// The item's value for the given facet dimension, if it has one.
    pub fn attribute(&self, facet_id: &str) -> Option<&str> {
        self.attributes.get(facet_id).map(String::as_str)
    }
}

pub trait Matcher: Send + Sync {
    /// Checks the free text query against an item's haystack.
    /// A blank query must match every haystack.
    fn matches(&self, query: &str, haystack: &str) -> bool;
}

/// Deserialized shape of an exercise in a JSON item file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub muscle: String,
    pub equipment: String,
    pub difficulty: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub image_url: Option<String>,

    /// Any other keys. String values become attributes for custom facets.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<ExerciseRecord> for CatalogItem {
    fn from(record: ExerciseRecord) -> Self {
        let mut item = CatalogItem::new(record.id, record.name, record.duration_minutes)
            .with_attribute(MUSCLE, record.muscle)
            .with_attribute(EQUIPMENT, record.equipment)
            .with_attribute(DIFFICULTY, record.difficulty);

        for (facet_id, value) in record.extra {
            match value {
                serde_json::Value::String(value) => {
                    item.attributes.insert(facet_id, value);
                }
                other => log::debug!("skipping non-string attribute {facet_id}={other} of item {}", item.id),
            }
        }

        item.image_url = record.image_url;
        item
    }
}
