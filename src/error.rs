use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Fatal failure loading the source table. Halts the pipeline before any
/// render; surfaced to the user with the underlying cause. Never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching CSV over HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid table schema: {0}")]
    Schema(#[from] PipelineError),

    #[error("parsing GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Internal pipeline failure (e.g. a malformed feature matrix). The
/// orchestrator absorbs these by degrading to the constant-zero cluster
/// fallback rather than aborting the render.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column '{name}' has {actual} values, expected {expected}")]
    NonRectangular {
        name: String,
        actual: usize,
        expected: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("numeric column '{0}' not present in table")]
    MissingColumn(String),
}
