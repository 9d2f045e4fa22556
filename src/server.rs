//! HTTP server for submitting and reading vitals.
//!
//! Routes:
//! - `GET  /health`
//! - `POST /records` submit vitals, returns the full outcome
//! - `GET  /records` shared history log
//! - `GET  /users/:user_id/latest`
//! - `GET  /users/:user_id/history`
//! - `GET  /users/:user_id/trend` chart spec and summary
//! - `POST /assess` evaluate vitals without storing
//! - `GET  /directory/doctors`
//!
//! The tracker sits behind a write lock for submissions, so concurrent
//! saves are applied one at a time and the history stays append-only.

use crate::directory::{Directory, Doctor};
use crate::record::{Clock, HealthRecord};
use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreError};
use crate::tracker::{Assessment, HealthTracker, Submission, SubmissionOutcome, TrackerError};
use crate::trend::{ChartSeries, ChartSpec, TrendSummary};
use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Backend type shared by request handlers.
pub type SharedBackend = Box<dyn KeyValueStore + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Store file; records are kept in memory when unset
    pub store_path: Option<PathBuf>,
    /// Listings returned with assessments
    pub directory: Directory,
    /// Clock for new record timestamps
    pub clock: Clock,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(port: u16, store_path: Option<PathBuf>) -> Self {
        Self {
            port,
            store_path,
            directory: Directory::default(),
            clock: Clock::Local,
        }
    }
}

/// Shared server state
pub struct ServerState {
    tracker: RwLock<HealthTracker<SharedBackend>>,
}

impl ServerState {
    /// Create new server state, opening the store if one is configured
    pub fn new(config: &ServerConfig) -> Result<Self, StoreError> {
        let backend: SharedBackend = match &config.store_path {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };

        Ok(Self {
            tracker: RwLock::new(HealthTracker::new(
                backend,
                config.directory.clone(),
                config.clock.clone(),
            )),
        })
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Body of `POST /assess`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRequest {
    pub blood_pressure: String,
    pub blood_sugar: u32,
    pub heart_rate: u32,
}

/// Response of `GET /users/:user_id/trend`
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendResponse {
    pub series: ChartSeries,
    pub summary: TrendSummary,
    pub chart: ChartSpec,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: TrackerError) -> ApiError {
    let (status, code) = match &err {
        TrackerError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        e if e.is_invalid_input() => (StatusCode::BAD_REQUEST, "INVALID_RECORD"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /records
async fn submit(
    State(state): State<Arc<ServerState>>,
    Json(submission): Json<Submission>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    let mut tracker = state.tracker.write().await;
    tracker.submit(submission).map(Json).map_err(api_error)
}

/// GET /records
async fn history(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<HealthRecord>>, ApiError> {
    let tracker = state.tracker.read().await;
    tracker
        .store()
        .history()
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

/// GET /users/:user_id/latest
async fn latest(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<String>,
) -> Result<Json<HealthRecord>, ApiError> {
    let tracker = state.tracker.read().await;
    tracker
        .store()
        .latest(&user_id)
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

/// GET /users/:user_id/history
async fn user_history(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HealthRecord>>, ApiError> {
    let tracker = state.tracker.read().await;
    tracker
        .store()
        .history_for(&user_id)
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

/// GET /users/:user_id/trend
async fn trend(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TrendResponse>, ApiError> {
    let tracker = state.tracker.read().await;
    let series = tracker.trend(&user_id).map_err(api_error)?;

    Ok(Json(TrendResponse {
        summary: series.summary(),
        chart: ChartSpec::line(&series),
        series,
    }))
}

/// POST /assess
async fn assess(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AssessRequest>,
) -> Json<Assessment> {
    let tracker = state.tracker.read().await;
    Json(tracker.assess(
        &request.blood_pressure,
        request.blood_sugar,
        request.heart_rate,
    ))
}

/// GET /directory/doctors
async fn doctors(State(state): State<Arc<ServerState>>) -> Json<Vec<Doctor>> {
    let tracker = state.tracker.read().await;
    Json(tracker.directory().doctors.clone())
}

/// Build the router over `state`.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", post(submit).get(history))
        .route("/users/:user_id/latest", get(latest))
        .route("/users/:user_id/history", get(user_history))
        .route("/users/:user_id/trend", get(trend))
        .route("/assess", post(assess))
        .route("/directory/doctors", get(doctors))
        .layer(
            CorsLayer::new()
                .allow_origin([
                    HeaderValue::from_static("http://localhost"),
                    HeaderValue::from_static("http://127.0.0.1"),
                ])
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config)?);
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Vitals server listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
