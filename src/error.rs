// Error types for ghx.
// Covers transport failures, HTTP status errors and cache misuse.

use thiserror::Error;

/// Errors surfaced by the API client and the query caches.
///
/// The enum is `Clone` because a single in-flight request result is handed
/// to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{context}: {status}")]
    Http { context: String, status: u16 },

    #[error("JSON parsing error: {0}")]
    Decode(String),

    #[error("Invalid GITHUB_TOKEN value: {0}")]
    InvalidToken(String),

    #[error("Page {requested} requested before page {next}")]
    PageOutOfOrder { requested: u32, next: u32 },
}

impl ExplorerError {
    /// HTTP status code, when the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExplorerError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExplorerError::Decode(err.to_string())
        } else {
            ExplorerError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = ExplorerError::Http {
            context: "Error fetching repos for user ghost".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Error fetching repos for user ghost: 404");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_non_http_has_no_status() {
        let err = ExplorerError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
