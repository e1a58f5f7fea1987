use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a request against the GitHub API did not produce data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Unauthorized: the GitHub token is invalid or expired")]
    Unauthorized,

    #[error("Rate limited: API quota exhausted, try again later")]
    RateLimited,

    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Map a non-success status onto the taxonomy. Returns `None` for 2xx.
    pub fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status.as_u16() {
            401 => FetchError::Unauthorized,
            403 => FetchError::RateLimited,
            code => FetchError::Http {
                status: code,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            },
        })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::NetworkFailure(err.to_string())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
