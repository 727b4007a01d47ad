//! Minimal Rust client for the GitHub REST API
//!
//! Covers the read-only endpoints needed to summarise recent activity on a
//! public repository.
//!
//! # Example
//!
//! ```no_run
//! use github_api::GitHubClient;
//!
//! # async fn example() -> Result<(), github_api::GitHubError> {
//! let client = GitHubClient::new(None)?;
//!
//! let repo = client.get_repository("rust-lang", "rust").await?;
//! if !repo.private {
//!     for commit in client.list_commits("rust-lang", "rust", 5).await? {
//!         println!("{} {}", commit.sha, commit.commit.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /repos/{owner}/{repo}` - Repository metadata
//! - `GET /repos/{owner}/{repo}/commits` - Newest commits (first page)
//! - `GET /repos/{owner}/{repo}/events` - Newest activity events (first page)

mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use types::{Commit, Event, EventActor, GitCommit, GitSignature, Repository};
