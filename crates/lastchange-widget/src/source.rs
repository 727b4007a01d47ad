//! Upstream seam: where repository metadata, commits and events come from

use crate::types::{CommitSummary, RepositoryEvent, RepositoryIdentity};
use async_trait::async_trait;
use github_api::{Commit, Event, GitHubClient, GitHubError};

/// Repository metadata the fetch policy cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub private: bool,
}

/// Read access to a code-hosting API
///
/// Implementations must report a missing repository as
/// [`GitHubError::NotFound`] so the caller can tell it apart from outages.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn get_repository(&self, repo: &RepositoryIdentity)
        -> Result<RepositoryInfo, GitHubError>;

    /// Up to `limit` commits, newest first
    async fn list_commits(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
    ) -> Result<Vec<CommitSummary>, GitHubError>;

    /// Up to `limit` activity events, newest first
    async fn list_events(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
    ) -> Result<Vec<RepositoryEvent>, GitHubError>;
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn get_repository(
        &self,
        repo: &RepositoryIdentity,
    ) -> Result<RepositoryInfo, GitHubError> {
        let data = GitHubClient::get_repository(self, &repo.owner, &repo.name).await?;
        Ok(RepositoryInfo {
            private: data.private,
        })
    }

    async fn list_commits(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
    ) -> Result<Vec<CommitSummary>, GitHubError> {
        GitHubClient::list_commits(self, &repo.owner, &repo.name, limit)
            .await?
            .into_iter()
            .map(to_commit_summary)
            .collect()
    }

    async fn list_events(
        &self,
        repo: &RepositoryIdentity,
        limit: u8,
    ) -> Result<Vec<RepositoryEvent>, GitHubError> {
        let events = self
            .list_repository_events(&repo.owner, &repo.name, limit)
            .await?;
        Ok(events.into_iter().map(to_repository_event).collect())
    }
}

/// Git allows either signature to be absent; borrow the other one's date
fn to_commit_summary(commit: Commit) -> Result<CommitSummary, GitHubError> {
    let author = commit.commit.author.map(|a| a.date);
    let committer = commit.commit.committer.map(|c| c.date);

    let (author_date, committer_date) = match (author, committer) {
        (Some(a), Some(c)) => (a, c),
        (Some(a), None) => (a, a),
        (None, Some(c)) => (c, c),
        (None, None) => {
            return Err(GitHubError::Malformed(format!(
                "commit {} has neither author nor committer date",
                commit.sha
            )))
        }
    };

    Ok(CommitSummary {
        author_date,
        committer_date,
        message: commit.commit.message,
    })
}

fn to_repository_event(event: Event) -> RepositoryEvent {
    RepositoryEvent {
        id: event.id,
        kind: event.kind.unwrap_or_else(|| "UnknownEvent".to_string()),
        actor: event.actor.map(|a| a.login),
        created_at: event.created_at,
    }
}
