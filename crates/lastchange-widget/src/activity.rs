//! Cached access to recent repository activity
//!
//! Private and missing repositories resolve to an empty list that is cached
//! like any other answer. Every other upstream failure is returned to the
//! caller untouched and never cached.
//!
//! The HTTP endpoint only reads commits. Events are exposed for library
//! callers and share the same caching rules.

use crate::cache::{Clock, TtlCache, DATA_TTL};
use crate::config::ExecutionMode;
use crate::error::{Result, WidgetError};
use crate::source::RepositorySource;
use crate::types::{clamp_commits, CacheStats, CommitSummary, RepositoryEvent, RepositoryIdentity};
use github_api::GitHubError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a cache entry holds; part of every cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Commits,
    Events,
}

impl FetchKind {
    fn as_str(self) -> &'static str {
        match self {
            FetchKind::Commits => "commits",
            FetchKind::Events => "events",
        }
    }
}

/// Cache key for one `(kind, owner, name, limit)` combination
pub fn cache_key(kind: FetchKind, repo: &RepositoryIdentity, limit: u8) -> String {
    format!("{}:{}/{}+{}", kind.as_str(), repo.owner, repo.name, limit)
}

pub struct ActivityService {
    source: Arc<dyn RepositorySource>,
    commits: TtlCache<Arc<Vec<CommitSummary>>>,
    events: TtlCache<Arc<Vec<RepositoryEvent>>>,
}

impl ActivityService {
    pub fn new(source: Arc<dyn RepositorySource>, clock: Arc<dyn Clock>, mode: ExecutionMode) -> Self {
        let caching = !mode.is_development();

        Self {
            source,
            commits: TtlCache::new(clock.clone(), caching),
            events: TtlCache::new(clock, caching),
        }
    }

    /// Newest commits of a public repository, or an empty list when the
    /// repository is private or does not exist
    pub async fn fetch_recent_commits(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<CommitSummary>>> {
        let limit = clamp_commits(limit);
        let key = cache_key(FetchKind::Commits, repo, limit);

        let fetch = self.commits.get_or_compute(&key, DATA_TTL, || {
            load_commits(self.source.as_ref(), repo, limit)
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(repo = %repo, "Commit fetch cancelled");
                Err(WidgetError::Cancelled)
            }
            result = fetch => result.map_err(|e| {
                warn!(repo = %repo, limit, error = %e, "Failed to fetch recent commits");
                WidgetError::from(e)
            }),
        }
    }

    /// Newest public activity events, or an empty list when the repository
    /// does not exist
    pub async fn fetch_recent_events(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<RepositoryEvent>>> {
        let limit = clamp_commits(limit);
        let key = cache_key(FetchKind::Events, repo, limit);

        let fetch = self.events.get_or_compute(&key, DATA_TTL, || {
            load_events(self.source.as_ref(), repo, limit)
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WidgetError::Cancelled),
            result = fetch => result.map_err(|e| {
                warn!(repo = %repo, limit, error = %e, "Failed to fetch recent events");
                WidgetError::from(e)
            }),
        }
    }

    /// Combined statistics of both caches
    pub async fn cache_stats(&self) -> CacheStats {
        let commits = self.commits.stats().await;
        let events = self.events.stats().await;

        CacheStats {
            entries: commits.entries + events.entries,
            hits: commits.hits + events.hits,
            misses: commits.misses + events.misses,
        }
    }
}

async fn load_commits(
    source: &dyn RepositorySource,
    repo: &RepositoryIdentity,
    limit: u8,
) -> std::result::Result<Arc<Vec<CommitSummary>>, GitHubError> {
    let outcome: std::result::Result<Vec<CommitSummary>, GitHubError> = async {
        if source.get_repository(repo).await?.private {
            info!(repo = %repo, "Repository is private, caching empty result");
            return Ok(Vec::new());
        }
        source.list_commits(repo, limit).await
    }
    .await;

    match outcome {
        Ok(commits) => {
            debug!(repo = %repo, count = commits.len(), "Fetched recent commits");
            Ok(Arc::new(commits))
        }
        Err(e) if e.is_not_found() => {
            info!(repo = %repo, "Repository not found, caching empty result");
            Ok(Arc::new(Vec::new()))
        }
        Err(e) => Err(e),
    }
}

async fn load_events(
    source: &dyn RepositorySource,
    repo: &RepositoryIdentity,
    limit: u8,
) -> std::result::Result<Arc<Vec<RepositoryEvent>>, GitHubError> {
    match source.list_events(repo, limit).await {
        Ok(events) => Ok(Arc::new(events)),
        Err(e) if e.is_not_found() => Ok(Arc::new(Vec::new())),
        Err(e) => Err(e),
    }
}
