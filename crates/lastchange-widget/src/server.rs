//! HTTP server for widget endpoints
//!
//! Provides /health and /widgets/{provider}/{owner}/{repo}/changes/latest.

use crate::activity::ActivityService;
use crate::cache::Clock;
use crate::error::WidgetError;
use crate::headers::cache_headers;
use crate::render::render_widget;
use crate::types::{HealthResponse, RenderRequest, RepositoryIdentity};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

const SUPPORTED_PROVIDER: &str = "github";
const MAX_OWNER_LEN: usize = 39;
const MAX_REPO_LEN: usize = 100;

/// Shared state for the HTTP server
pub struct ServerState {
    pub activity: ActivityService,
    pub clock: Arc<dyn Clock>,
    /// Cancelled on shutdown; each request works under a child token
    pub shutdown: CancellationToken,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(activity: ActivityService, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            activity,
            clock,
            shutdown: CancellationToken::new(),
            started_at,
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Widget query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetQuery {
    #[serde(default = "default_base_font_size")]
    base_font_size: f64,
    #[serde(default)]
    foreground_colour: Option<String>,
    #[serde(default)]
    background_colour: Option<String>,
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_max_commits")]
    max_commits: i64,
}

fn default_base_font_size() -> f64 {
    RenderRequest::DEFAULT_BASE_FONT_SIZE
}

fn default_width() -> f64 {
    RenderRequest::DEFAULT_WIDTH
}

fn default_max_commits() -> i64 {
    RenderRequest::DEFAULT_MAX_COMMITS as i64
}

/// Check path and query values, producing the render request on success
fn validate(owner: &str, repo: &str, query: WidgetQuery) -> Result<RenderRequest, String> {
    let owner_len = owner.chars().count();
    if owner_len == 0 || owner_len > MAX_OWNER_LEN {
        return Err("Please specify a GitHub username or organisation name!".to_string());
    }

    let repo_len = repo.chars().count();
    if repo_len == 0 || repo_len > MAX_REPO_LEN {
        return Err("Please specify a public GitHub repository name!".to_string());
    }

    let allowed = RenderRequest::MIN_COMMITS as i64..=RenderRequest::MAX_COMMITS as i64;
    if !allowed.contains(&query.max_commits) {
        return Err(format!(
            "Allowed values for maxCommits include {} to {}.",
            RenderRequest::MIN_COMMITS,
            RenderRequest::MAX_COMMITS
        ));
    }

    if !query.width.is_finite() || query.width <= 0.0 {
        return Err("width must be a positive number.".to_string());
    }
    if !query.base_font_size.is_finite() || query.base_font_size <= 0.0 {
        return Err("baseFontSize must be a positive number.".to_string());
    }

    Ok(RenderRequest {
        foreground_colour: query.foreground_colour,
        background_colour: query.background_colour,
        width: query.width,
        base_font_size: query.base_font_size,
        max_commits: query.max_commits as u8,
    })
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/widgets/{provider}/{owner}/{repo}/changes/latest",
            get(latest_changes),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server; returns once shutdown has been requested and
/// in-flight requests have drained
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let shutdown = state.shutdown.clone();
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (state.clock.now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.activity.cache_stats().await,
    })
}

/// Render the latest-changes widget for a repository
async fn latest_changes(
    State(state): State<SharedState>,
    Path((provider, owner, repo)): Path<(String, String, String)>,
    Query(query): Query<WidgetQuery>,
) -> Response {
    if provider != SUPPORTED_PROVIDER {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Unsupported provider: {}", provider),
        );
    }

    let request = match validate(&owner, &repo, query) {
        Ok(request) => request,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let repo = RepositoryIdentity::new(owner, repo);
    let cancel = state.shutdown.child_token();

    let commits = match state
        .activity
        .fetch_recent_commits(&repo, request.max_commits, &cancel)
        .await
    {
        Ok(commits) => commits,
        Err(WidgetError::Cancelled) => {
            warn!(repo = %repo, "Widget request cancelled");
            return error_response(StatusCode::SERVICE_UNAVAILABLE, "Request cancelled");
        }
        Err(e) => {
            error!(repo = %repo, error = %e, "Failed to load repository activity");
            return error_response(StatusCode::BAD_GATEWAY, "Failed to load repository activity");
        }
    };

    if cancel.is_cancelled() {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Request cancelled");
    }

    let now = state.clock.now();
    let svg = render_widget(&commits, &request, now);

    let mut response = Response::new(Body::from(svg));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("image/svg+xml"),
    );
    cache_headers(now).apply(response.headers_mut());
    response
}
