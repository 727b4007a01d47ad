//! GitHub REST API HTTP client

use crate::error::{GitHubError, Result};
use crate::types::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = "lastchange-widget";
const API_VERSION: &str = "2022-11-28";

/// Client for the subset of the GitHub REST API needed to summarise recent
/// repository activity.
///
/// Requests are unauthenticated unless a bearer token is supplied, in which
/// case the (much higher) authenticated rate limit applies.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Base URL for the public GitHub REST API
    pub const BASE_URL: &'static str = "https://api.github.com";

    /// Create a client against api.github.com
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(Self::BASE_URL, token)
    }

    /// Create a client against a custom API root (GitHub Enterprise, tests)
    pub fn with_base_url(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GitHubError::Malformed(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get repository metadata
    ///
    /// Returns [`GitHubError::NotFound`] when the repository does not exist or
    /// is not visible with the configured credentials.
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository> {
        let url = self.repo_url(owner, name, "");
        self.get_json(&url).await
    }

    /// List the newest commits on the default branch (first page only)
    ///
    /// # Arguments
    /// * `owner` - Repository owner (user or organisation)
    /// * `name` - Repository name
    /// * `per_page` - Page size; GitHub caps this at 100
    pub async fn list_commits(&self, owner: &str, name: &str, per_page: u8) -> Result<Vec<Commit>> {
        let url = format!(
            "{}?per_page={}&page=1",
            self.repo_url(owner, name, "/commits"),
            per_page
        );
        self.get_json(&url).await
    }

    /// List the newest public activity events for a repository (first page only)
    pub async fn list_repository_events(
        &self,
        owner: &str,
        name: &str,
        per_page: u8,
    ) -> Result<Vec<Event>> {
        let url = format!(
            "{}?per_page={}&page=1",
            self.repo_url(owner, name, "/events"),
            per_page
        );
        self.get_json(&url).await
    }

    fn repo_url(&self, owner: &str, name: &str, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(name),
            suffix
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "GitHub API request");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok());
            return Err(classify_status(status, remaining, url));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Map a non-success status onto the error taxonomy
fn classify_status(status: StatusCode, ratelimit_remaining: Option<&str>, url: &str) -> GitHubError {
    let exhausted = ratelimit_remaining.map(|r| r.trim() == "0").unwrap_or(false);

    match status {
        StatusCode::NOT_FOUND => GitHubError::NotFound(url.to_string()),
        StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimited(url.to_string()),
        StatusCode::FORBIDDEN if exhausted => GitHubError::RateLimited(url.to_string()),
        _ => GitHubError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        },
    }
}
