use serde::{Deserialize, Serialize};

use crate::catalog::{Comparison, FilterError};

pub const MUSCLE: &str = "muscle";
pub const EQUIPMENT: &str = "equipment";
pub const DIFFICULTY: &str = "difficulty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,

    /// Number of items this option matches, shown next to the label.
    #[serde(default)]
    pub count: Option<usize>,
}

impl FacetOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDefinition {
    pub id: String,
    pub name: String,
    pub comparison: Comparison,
    pub options: Vec<FacetOption>,
}

impl FacetDefinition {
    pub fn option(&self, value: &str) -> Option<&FacetOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// The known facets and their options. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetCatalog {
    facets: Vec<FacetDefinition>,
}

impl FacetCatalog {
    pub fn new(facets: Vec<FacetDefinition>) -> Self {
        Self { facets }
    }

    /// Muscle group, equipment and difficulty facets of the exercise library.
    pub fn exercises() -> Self {
        fn options(pairs: &[(&str, &str)]) -> Vec<FacetOption> {
            pairs.iter().map(|(value, label)| FacetOption::new(*value, *label)).collect()
        }

        Self::new(vec![
            FacetDefinition {
                id: MUSCLE.into(),
                name: "Muscle Group".into(),
                comparison: Comparison::IgnoreCase,
                options: options(&[
                    ("chest", "Chest"),
                    ("back", "Back"),
                    ("legs", "Legs"),
                    ("shoulders", "Shoulders"),
                    ("arms", "Arms"),
                    ("core", "Core"),
                ]),
            },
            FacetDefinition {
                id: EQUIPMENT.into(),
                name: "Equipment".into(),
                comparison: Comparison::Contains,
                options: options(&[
                    ("bodyweight", "Bodyweight"),
                    ("dumbbell", "Dumbbell"),
                    ("barbell", "Barbell"),
                    ("kettlebell", "Kettlebell"),
                    ("resistance band", "Resistance Band"),
                    ("machine", "Machine"),
                ]),
            },
            FacetDefinition {
                id: DIFFICULTY.into(),
                name: "Difficulty".into(),
                comparison: Comparison::Exact,
                options: options(&[
                    ("beginner", "Beginner"),
                    ("intermediate", "Intermediate"),
                    ("advanced", "Advanced"),
                ]),
            },
        ])
    }

    pub fn facets(&self) -> &[FacetDefinition] {
        &self.facets
    }

    pub fn facet(&self, id: &str) -> Option<&FacetDefinition> {
        self.facets.iter().find(|facet| facet.id == id)
    }

    pub fn option(&self, facet_id: &str, value: &str) -> Option<&FacetOption> {
        self.facet(facet_id).and_then(|facet| facet.option(value))
    }

    /// Checks that the facet exists and offers the given option value.
    pub fn validate(&self, facet_id: &str, value: &str) -> Result<(), FilterError> {
        let facet = self
            .facet(facet_id)
            .ok_or_else(|| FilterError::InvalidFacetId(facet_id.to_owned()))?;

        match facet.option(value) {
            Some(_) => Ok(()),
            None => Err(FilterError::InvalidOptionValue {
                facet: facet_id.to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    pub(crate) fn facets_mut(&mut self) -> impl Iterator<Item = &mut FacetDefinition> {
        self.facets.iter_mut()
    }
}

impl Default for FacetCatalog {
    fn default() -> Self {
        Self::exercises()
    }
}
