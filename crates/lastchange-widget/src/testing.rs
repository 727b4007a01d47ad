//! Test doubles shared by the unit tests of several modules

use crate::cache::Clock;
use crate::source::{RepositoryInfo, RepositorySource};
use crate::types::{CommitSummary, RepositoryEvent, RepositoryIdentity};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use github_api::GitHubError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

enum Behaviour {
    Public(Vec<CommitSummary>),
    Private,
    Missing,
    Failing,
}

/// In-memory [`RepositorySource`] that counts every upstream call
pub struct FakeSource {
    behaviour: Behaviour,
    stalled: AtomicBool,
    release: Notify,
    repository_calls: AtomicUsize,
    commit_calls: AtomicUsize,
    event_calls: AtomicUsize,
    limits: Mutex<Vec<u8>>,
}

impl FakeSource {
    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            stalled: AtomicBool::new(false),
            release: Notify::new(),
            repository_calls: AtomicUsize::new(0),
            commit_calls: AtomicUsize::new(0),
            event_calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn public(commits: Vec<CommitSummary>) -> Self {
        Self::with(Behaviour::Public(commits))
    }

    pub fn private() -> Self {
        Self::with(Behaviour::Private)
    }

    pub fn missing() -> Self {
        Self::with(Behaviour::Missing)
    }

    /// Every call fails with a rate-limit error
    pub fn failing() -> Self {
        Self::with(Behaviour::Failing)
    }

    /// Repository lookups hang until [`FakeSource::release`] is called
    pub fn stalled(self) -> Self {
        self.stalled.store(true, Ordering::SeqCst);
        self
    }

    /// Let current and future repository lookups through
    pub fn release(&self) {
        self.stalled.store(false, Ordering::SeqCst);
        self.release.notify_waiters();
    }

    pub fn repository_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    pub fn requested_limits(&self) -> Vec<u8> {
        self.limits.lock().unwrap().clone()
    }

    fn error(&self, repo: &RepositoryIdentity) -> Option<GitHubError> {
        match self.behaviour {
            Behaviour::Missing => Some(GitHubError::NotFound(repo.to_string())),
            Behaviour::Failing => Some(GitHubError::RateLimited(repo.to_string())),
            _ => None,
        }
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn get_repository(
        &self,
        repo: &RepositoryIdentity,
    ) -> Result<RepositoryInfo, GitHubError> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        while self.stalled.load(Ordering::SeqCst) {
            let released = self.release.notified();
            if !self.stalled.load(Ordering::SeqCst) {
                break;
            }
            released.await;
        }
        if let Some(err) = self.error(repo) {
            return Err(err);
        }
        Ok(RepositoryInfo {
            private: matches!(self.behaviour, Behaviour::Private),
        })
    }

    async fn list_commits(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
    ) -> Result<Vec<CommitSummary>, GitHubError> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().unwrap().push(limit);
        if let Some(err) = self.error(repo) {
            return Err(err);
        }
        match &self.behaviour {
            Behaviour::Public(commits) => {
                Ok(commits.iter().take(limit as usize).cloned().collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn list_events(
        &self,
        repo: &RepositoryIdentity,
        _limit: u8,
    ) -> Result<Vec<RepositoryEvent>, GitHubError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.error(repo) {
            return Err(err);
        }
        Ok(vec![RepositoryEvent {
            id: "1".to_string(),
            kind: "PushEvent".to_string(),
            actor: Some("octocat".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
        }])
    }
}

/// `count` commits, the newest committed at 2024-01-01T10:00:00Z and each
/// older one an hour earlier
pub fn sample_commits(count: usize) -> Vec<CommitSummary> {
    let newest = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let committer_date = newest - TimeDelta::hours(i as i64);
            CommitSummary {
                author_date: committer_date - TimeDelta::minutes(5),
                committer_date,
                message: format!("Commit number {}", i + 1),
            }
        })
        .collect()
}

/// Manual clock five minutes after the newest sample commit
pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap(),
    ))
}
