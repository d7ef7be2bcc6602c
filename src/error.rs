use thiserror::Error;

/// Result type alias for appdeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by storage, import and export
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Import payload parsed but had the wrong shape
    #[error("Invalid format: {0}")]
    InvalidFormat(&'static str),

    #[error("Nothing to export")]
    NothingToExport,
}
