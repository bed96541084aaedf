//! HTTP gateway: POST /query → rewrite engine → JSON response.
//!
//! The body is parsed as JSON whatever its `Content-Type`: the form posts
//! JSON text labelled as urlencoded. Request-level failures (bad pattern,
//! missing directory) are still 200 with `Error` set; the form reads only the
//! body. The engine runs on the blocking
//! pool and enforces its own per-query deadline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use omni_rewrite::{Query, QueryResult, RewriteEngine};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state for the HTTP server: engine + optional concurrency limit.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<RewriteEngine>,
    /// When Some, limits concurrent queries; excess requests wait for a slot.
    pub concurrency_semaphore: Option<Arc<Semaphore>>,
    pub max_concurrent_queries: Option<usize>,
}

/// Gateway options beyond the engine itself.
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    /// Limit concurrent queries (None = no limit).
    pub max_concurrent_queries: Option<usize>,
    /// Serve the form's static assets from here at `/`.
    pub static_dir: Option<PathBuf>,
}

/// Response body for gateway health endpoint.
#[derive(Debug, Serialize)]
pub struct GatewayHealthResponse {
    pub status: &'static str,
    pub data_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_queries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_flight_queries: Option<usize>,
}

async fn handle_query(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<QueryResult>, (StatusCode, String)> {
    let query: Query = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejected query body");
        (StatusCode::BAD_REQUEST, format!("invalid query body: {e}"))
    })?;

    let _permit = if let Some(ref sem) = state.concurrency_semaphore {
        Some(sem.acquire().await.map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "concurrency limit closed".to_string(),
            )
        })?)
    } else {
        None
    };

    tracing::debug!(
        directory = %query.directory,
        suffixes = ?query.file_suffixes,
        commit = query.commit,
        "query received"
    );

    let engine = Arc::clone(&state.engine);
    let result = tokio::task::spawn_blocking(move || engine.run(&query))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "query worker failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("query worker failed: {e}"),
            )
        })?;
    Ok(Json(result))
}

async fn handle_health(State(state): State<GatewayState>) -> Json<GatewayHealthResponse> {
    let config = state.engine.config();
    let in_flight_queries = state.max_concurrent_queries.and_then(|max| {
        state
            .concurrency_semaphore
            .as_ref()
            .map(|sem| max.saturating_sub(sem.available_permits()))
    });
    Json(GatewayHealthResponse {
        status: "healthy",
        data_root: config.data_root.display().to_string(),
        query_timeout_secs: config.timeout.map(|t| t.as_secs()),
        max_concurrent_queries: state.max_concurrent_queries,
        in_flight_queries,
    })
}

/// Build the gateway router.
///
/// Routes: `POST /query`, `GET /health`, `GET /view/*` (raw files under the
/// data root) and, when configured, the static form at `/`.
pub fn router(engine: RewriteEngine, options: GatewayOptions) -> Router {
    let data_root = engine.config().data_root.clone();
    let concurrency_semaphore = options
        .max_concurrent_queries
        .map(|n| Arc::new(Semaphore::new(n)));
    let state = GatewayState {
        engine: Arc::new(engine),
        concurrency_semaphore,
        max_concurrent_queries: options.max_concurrent_queries,
    };

    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/query", post(handle_query))
        .nest_service("/view", ServeDir::new(data_root));
    if let Some(static_dir) = options.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }
    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the HTTP server; binds to `bind_addr` (e.g. `0.0.0.0:5432`).
/// Graceful shutdown on Ctrl+C (SIGINT) and SIGTERM (Unix); in-flight queries
/// complete before exit, so no commit is cut off mid-write.
pub async fn run_http(engine: RewriteEngine, bind_addr: &str, options: GatewayOptions) -> Result<()> {
    let timeout = engine
        .config()
        .timeout
        .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));
    let max_str = options
        .max_concurrent_queries
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    let data_root = engine.config().data_root.display().to_string();

    let app = router(engine, options);
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(
        "gateway listening on {} (data_root={}, query_timeout={}, max_concurrent={}, Ctrl+C/SIGTERM to stop)",
        bind_addr,
        data_root,
        timeout,
        max_str
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
