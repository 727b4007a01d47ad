//! Error types for the GitHub API client

use std::fmt;

/// Errors that can occur when talking to the GitHub REST API
///
/// `NotFound` is kept apart from every other failure so callers can treat a
/// missing (or hidden) repository as a definitive answer rather than an outage.
#[derive(Debug)]
pub enum GitHubError {
    /// The requested resource does not exist or is not visible to the caller
    NotFound(String),
    /// The API rate limit for this identity has been exhausted
    RateLimited(String),
    /// Any other non-success HTTP status
    Status { status: u16, url: String },
    /// Transport level failure (DNS, TLS, connection reset, body decoding)
    Http(reqwest::Error),
    /// The response was well-formed HTTP but not the payload we expected
    Malformed(String),
}

impl GitHubError {
    /// Whether this error means the resource is permanently absent for now
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(url) => write!(f, "GitHub resource not found: {}", url),
            Self::RateLimited(url) => write!(f, "GitHub rate limit exceeded: {}", url),
            Self::Status { status, url } => {
                write!(f, "GitHub returned status {} for {}", status, url)
            }
            Self::Http(e) => write!(f, "GitHub HTTP error: {}", e),
            Self::Malformed(msg) => write!(f, "GitHub malformed response: {}", msg),
        }
    }
}

impl std::error::Error for GitHubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Result type for GitHub API operations
pub type Result<T> = std::result::Result<T, GitHubError>;
