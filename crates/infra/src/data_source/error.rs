use thiserror::Error;

use bizlens_core::DomainError;

pub type DataResult<T> = Result<T, DataSourceError>;

#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store lock poisoned")]
    Poisoned,
}

impl DataSourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataSourceError::NotFound | DataSourceError::Domain(DomainError::NotFound))
    }
}

impl From<reqwest::Error> for DataSourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DataSourceError::Decode(e.to_string())
        } else {
            DataSourceError::Transport(e.to_string())
        }
    }
}
