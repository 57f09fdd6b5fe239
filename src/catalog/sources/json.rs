use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::catalog::{CatalogItem, ExerciseRecord, SourceError};
use crate::catalog::sources::ItemSource;

/// A JSON file holding an array of exercise records.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ItemSource for JsonFile {
    fn title(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<CatalogItem>, SourceError> {
        let fp = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let records: Vec<ExerciseRecord> = serde_json::from_reader(BufReader::new(fp))
            .map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
