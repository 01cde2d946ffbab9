use thiserror::Error;

/// Clinic store and corpus error types
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid intent corpus: {0}")]
    InvalidCorpus(String),

    #[error("Store error: {0}")]
    Store(String),
}
