use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The dictionary store could not be opened or read. Fatal for a batch.
    #[error("Dictionary store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Seeding error: {0}")]
    Seed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ResolveError {
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, ResolveError::StoreUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
