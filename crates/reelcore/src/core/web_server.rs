//! HTTP API server.
//!
//! Serves snapsave resolution and reel metadata as JSON on PORT (default 5000).
//! Every route is a GET; `url` is the only query parameter.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::core::error::{AppError, AppResult};
use crate::download::{merge_info, MediaResolver, SnapsaveClient};
use crate::metadata::{InstagramScraper, MetadataProvider};

const MSG_URL_REQUIRED: &str = "URL parameter is required";
const MSG_INTERNAL: &str = "Internal Server Error";

/// Shared state for the web server.
#[derive(Clone)]
pub struct WebState {
    resolver: Arc<dyn MediaResolver>,
    metadata: Arc<dyn MetadataProvider>,
    start_time: Instant,
}

impl WebState {
    pub fn new(resolver: Arc<dyn MediaResolver>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            resolver,
            metadata,
            start_time: Instant::now(),
        }
    }

    /// State backed by the real snapsave and Instagram clients.
    pub fn from_config() -> AppResult<Self> {
        let resolver = SnapsaveClient::new()?;
        let metadata = InstagramScraper::new()?;
        log::info!("Web state ready: resolver={}, metadata={}", resolver.name(), metadata.name());
        Ok(Self::new(Arc::new(resolver), Arc::new(metadata)))
    }
}

#[derive(Debug, Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

impl UrlQuery {
    /// The `url` parameter, or `None` when absent or blank.
    fn target(self) -> Option<String> {
        self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
    }
}

/// Router with every route registered.
pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/igdl", get(igdl_handler))
        .route("/api/metadata", get(metadata_handler))
        .route("/api/info", get(info_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the API server.
pub async fn start_web_server(port: u16, state: WebState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(state);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /igdl?url=          - snapsave download links");
    log::info!("  /api/metadata?url=  - reel metadata");
    log::info!("  /api/info?url=      - metadata merged with download links");
    log::info!("  /health             - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn url_required() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": MSG_URL_REQUIRED }))).into_response()
}

fn internal_error(route: &str, url: &str, err: &AppError) -> Response {
    log::error!("{} failed for {} [{}]: {}", route, url, err.category(), err);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": MSG_INTERNAL }))).into_response()
}

/// GET /: liveness banner.
async fn root_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /igdl?url=: snapsave result as returned by the resolver.
async fn igdl_handler(State(state): State<WebState>, Query(query): Query<UrlQuery>) -> Response {
    let Some(url) = query.target() else {
        return url_required();
    };
    log::info!("/igdl request: {}", url);

    match state.resolver.resolve(&url).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => internal_error("/igdl", &url, &e),
    }
}

/// GET /api/metadata?url=: scraped reel metadata.
async fn metadata_handler(State(state): State<WebState>, Query(query): Query<UrlQuery>) -> Response {
    let Some(url) = query.target() else {
        return url_required();
    };
    log::info!("/api/metadata request: {}", url);

    match state.metadata.fetch_metadata(&url).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => internal_error("/api/metadata", &url, &e),
    }
}

/// GET /api/info?url=: metadata and download links in one object.
async fn info_handler(State(state): State<WebState>, Query(query): Query<UrlQuery>) -> Response {
    let Some(url) = query.target() else {
        return url_required();
    };
    log::info!("/api/info request: {}", url);

    let combined = async {
        let (metadata, download) =
            tokio::try_join!(state.metadata.fetch_metadata(&url), state.resolver.resolve(&url))?;
        merge_info(&metadata, &download)
    };

    match combined.await {
        Ok(info) => Json(info).into_response(),
        Err(e) => internal_error("/api/info", &url, &e),
    }
}

/// GET /health: uptime and version.
async fn health_handler(State(state): State<WebState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed();

    let health_status = json!({
        "status": "healthy",
        "uptime_seconds": uptime.as_secs(),
        "uptime_human": format_duration(uptime),
        "service": "reelgrab",
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, Json(health_status))
}

/// Format duration as human-readable string
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
        assert_eq!(format_duration(Duration::from_secs(90061)), "1d 1h 1m 1s");
    }

    #[test]
    fn test_url_query_target() {
        let q = |url: Option<&str>| UrlQuery { url: url.map(String::from) }.target();
        assert_eq!(q(None), None);
        assert_eq!(q(Some("")), None);
        assert_eq!(q(Some("   ")), None);
        assert_eq!(
            q(Some(" https://www.instagram.com/reel/abc/ ")).as_deref(),
            Some("https://www.instagram.com/reel/abc/")
        );
    }
}
