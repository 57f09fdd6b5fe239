use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A toggle that references something the facet catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown facet '{0}'")]
    InvalidFacetId(String),

    #[error("facet '{facet}' has no option '{value}'")]
    InvalidOptionValue { facet: String, value: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read items from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse items in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
