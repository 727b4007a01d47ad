//! Error types for the last-change widget service

use std::fmt;

#[derive(Debug)]
pub enum WidgetError {
    /// Upstream failure that is not a definitive "not found"
    GitHub(github_api::GitHubError),
    /// The caller cancelled the request before it completed
    Cancelled,
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::GitHub(err) => write!(f, "{}", err),
            WidgetError::Cancelled => write!(f, "Request cancelled"),
            WidgetError::Io(err) => write!(f, "IO error: {}", err),
            WidgetError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::GitHub(err) => Some(err),
            WidgetError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<github_api::GitHubError> for WidgetError {
    fn from(err: github_api::GitHubError) -> Self {
        WidgetError::GitHub(err)
    }
}

impl From<std::io::Error> for WidgetError {
    fn from(err: std::io::Error) -> Self {
        WidgetError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for WidgetError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        WidgetError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
