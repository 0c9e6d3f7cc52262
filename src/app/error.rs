use thiserror::Error;

#[derive(Error, Debug)]
pub enum MurmurError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    /// Nothing could be collected for a subject. The caller may retry or skip.
    #[error("No data for @{subject}: {reason}")]
    NoData { subject: String, reason: String },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl MurmurError {
    /// Whether the failure concerns one run only and a later attempt may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            MurmurError::NoData { .. } | MurmurError::Browser(_) | MurmurError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MurmurError>;
