//! Core types for the last-change widget service

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Owner/name pair identifying an upstream repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub name: String,
}

impl RepositoryIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The parts of an upstream commit the widget displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub author_date: DateTime<Utc>,
    pub committer_date: DateTime<Utc>,
    pub message: String,
}

/// One entry of a repository's public activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEvent {
    pub id: String,
    pub kind: String,
    pub actor: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Visual parameters for one rendered widget
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub foreground_colour: Option<String>,
    pub background_colour: Option<String>,
    pub width: f64,
    pub base_font_size: f64,
    pub max_commits: u8,
}

impl RenderRequest {
    pub const DEFAULT_WIDTH: f64 = 830.0;
    pub const DEFAULT_BASE_FONT_SIZE: f64 = 14.0;
    pub const DEFAULT_MAX_COMMITS: u8 = 5;
    pub const MIN_COMMITS: u8 = 1;
    pub const MAX_COMMITS: u8 = 50;

    /// Copy of this request with every numeric field forced into a usable range
    pub fn sanitized(&self) -> Self {
        Self {
            foreground_colour: self.foreground_colour.clone(),
            background_colour: self.background_colour.clone(),
            width: positive_or(self.width, Self::DEFAULT_WIDTH),
            base_font_size: positive_or(self.base_font_size, Self::DEFAULT_BASE_FONT_SIZE),
            max_commits: clamp_commits(self.max_commits),
        }
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            foreground_colour: None,
            background_colour: None,
            width: Self::DEFAULT_WIDTH,
            base_font_size: Self::DEFAULT_BASE_FONT_SIZE,
            max_commits: Self::DEFAULT_MAX_COMMITS,
        }
    }
}

/// Force a commit limit into the supported `1..=50` range
pub fn clamp_commits(limit: u8) -> u8 {
    limit.clamp(RenderRequest::MIN_COMMITS, RenderRequest::MAX_COMMITS)
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Statistics about a cache
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}
