//! Data types for GitHub REST API responses
//!
//! Only the fields this workspace reads are modelled; everything else in the
//! payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Repository metadata from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub default_branch: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Author or committer identity attached to a git commit
#[derive(Debug, Clone, Deserialize)]
pub struct GitSignature {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: DateTime<Utc>,
}

/// The git-level commit object nested inside a commit listing
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
    #[serde(default)]
    pub message: String,
}

/// One entry from `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: GitCommit,
    pub html_url: Option<String>,
}

/// Minimal actor reference on an activity event
#[derive(Debug, Clone, Deserialize)]
pub struct EventActor {
    pub login: String,
}

/// One entry from `GET /repos/{owner}/{repo}/events`
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub actor: Option<EventActor>,
    pub created_at: Option<DateTime<Utc>>,
}
