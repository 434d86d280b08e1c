use thiserror::Error;

/// Failure talking to the search backend. Orchestration treats every
/// variant the same way; the split only exists for diagnostics.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status from {endpoint}: {status}")]
    Status { endpoint: String, status: u16 },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid response from {endpoint}: {details}")]
    Decode { endpoint: String, details: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
}

pub type Result<T, E = TransportError> = std::result::Result<T, E>;
