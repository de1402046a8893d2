//! HTTP query service.
//!
//! ## Endpoints
//!
//! - `POST /search`: run an aggregated search, returns a JSON array of results
//! - `GET /health`: liveness and catalog size

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use lighthouse_search::{Aggregator, SearchError, SearchSettings};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::error::LighthouseError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of a `POST /search` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query text.
    pub query: String,
    /// Optional per-query settings.
    #[serde(default)]
    pub settings: SearchSettings,
}

/// Response from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is running.
    pub status: String,
    /// Number of catalog items.
    pub items: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error details.
    pub error: ErrorBody,
}

/// Error details within an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Error type (`config_error`, `backend_error`, `timeout_error`,
    /// `invalid_request_error`).
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_type: &str) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                error_type: error_type.to_owned(),
            },
        }
    }
}

/// HTTP status and error type reported for a search failure.
pub fn error_status(err: &SearchError) -> (StatusCode, &'static str) {
    match err {
        SearchError::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
        SearchError::Backend(_) => (StatusCode::BAD_GATEWAY, "backend_error"),
        SearchError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout_error"),
    }
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    aggregator: Arc<Aggregator>,
    catalog: Arc<Catalog>,
}

// ---------------------------------------------------------------------------
// SearchServer
// ---------------------------------------------------------------------------

/// HTTP front end for an [`Aggregator`].
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the search HTTP server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(
        aggregator: Arc<Aggregator>,
        catalog: Arc<Catalog>,
        config: &ServerConfig,
    ) -> crate::error::Result<Self> {
        let state = AppState {
            aggregator,
            catalog,
        };

        let app = Router::new()
            .route("/search", post(handle_search))
            .route("/health", get(handle_health))
            .with_state(state);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| LighthouseError::Server(format!("bind {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| LighthouseError::Server(format!("failed to get local addr: {e}")))?;

        info!("search server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        items: state.catalog.len(),
    })
}

async fn handle_search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> (StatusCode, Json<serde_json::Value>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_json(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(rejection.body_text(), "invalid_request_error"),
            );
        }
    };

    let span = tracing::info_span!("search_request", request_id = %Uuid::new_v4());
    async move {
        match state
            .aggregator
            .search(&request.query, &request.settings)
            .await
        {
            Ok(results) => {
                info!(count = results.len(), "search complete");
                let json = serde_json::to_value(results).unwrap_or_default();
                (StatusCode::OK, Json(json))
            }
            Err(err) => {
                let (status, error_type) = error_status(&err);
                tracing::warn!(%status, error = %err, "search failed");
                error_json(status, ErrorResponse::new(err.to_string(), error_type))
            }
        }
    }
    .instrument(span)
    .await
}

fn error_json(status: StatusCode, err: ErrorResponse) -> (StatusCode, Json<serde_json::Value>) {
    let json = serde_json::to_value(err).unwrap_or_default();
    (status, Json(json))
}
