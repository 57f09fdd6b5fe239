use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{BuiltinExercises, FacetCatalog, FuzzyMatcher, ItemSource, JsonFile, Matcher, SimpleMatcher};

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "FITCATALOG_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Simple,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Include the exercises that ship with the application.
    #[serde(default = "default_builtin")]
    pub builtin: bool,

    /// JSON files with additional exercises, loaded in this order.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// How the free text query is matched against exercise names.
    #[serde(default)]
    pub matcher: MatcherKind,

    /// Replaces the built-in facet definitions.
    #[serde(default)]
    pub facets: Option<FacetCatalog>,
}

fn default_builtin() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            builtin: default_builtin(),
            sources: Vec::new(),
            matcher: MatcherKind::default(),
            facets: None,
        }
    }
}

impl Settings {
    /// Reads the file named by `FITCATALOG_CONFIG`, or returns the defaults if it is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let fp = File::open(path)
            .with_context(|| format!("failed to open settings file {}", path.display()))?;

        Self::from_reader(fp)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_reader(r: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(r))?)
    }

    pub fn catalog(&self) -> FacetCatalog {
        self.facets.clone().unwrap_or_default()
    }

    pub fn matcher(&self) -> Box<dyn Matcher> {
        match self.matcher {
            MatcherKind::Simple => Box::new(SimpleMatcher),
            MatcherKind::Fuzzy => Box::new(FuzzyMatcher::skim()),
        }
    }

    pub fn item_sources(&self) -> Vec<Arc<dyn ItemSource>> {
        let mut sources: Vec<Arc<dyn ItemSource>> = Vec::new();

        if self.builtin {
            sources.push(Arc::new(BuiltinExercises));
        }

        for path in &self.sources {
            sources.push(Arc::new(JsonFile::new(path)));
        }

        sources
    }
}
