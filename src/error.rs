/// Failure of the content generation collaborator. Always recoverable: the
/// caller shows a retry affordance.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service failed: {0}")]
    Service(String),
    #[error("generated content is malformed: {0}")]
    Malformed(String),
    #[error("io error talking to generator: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::Malformed(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("language pack not found: {0}")]
    Missing(String),
    #[error("language pack {name} is invalid: {source}")]
    Invalid {
        name: String,
        source: serde_json::Error,
    },
}

/// Key-value store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems reading or writing the persisted result history
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("stored history is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
