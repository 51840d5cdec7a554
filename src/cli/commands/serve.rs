//! HTTP server exposing the plan and agent routes.
//!
//! Each request builds its own plan generator or agent loop from the shared
//! orchestrator. Requests share no mutable state.

use crate::agent::AgentRun;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::ReelsmithError;
use crate::orchestrator::Orchestrator;
use crate::plan::Plan;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server until a shutdown signal arrives.
pub async fn run_serve(host: Option<String>, port: Option<u16>, mut settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'reelsmith doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let app = router(orchestrator);

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Reelsmith API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Plan", "GET  /simple");
    Output::kv("Agent", "GET  /tools");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    info!(%addr, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the router over an orchestrator.
pub fn router(orchestrator: Orchestrator) -> Router {
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/simple", get(simple))
        .route("/tools", get(tools))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve on Ctrl+C or SIGTERM; in-flight requests are drained after that.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

// === Response Types ===

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned from a handler.
struct ApiError(ReelsmithError);

impl From<ReelsmithError> for ApiError {
    fn from(err: ReelsmithError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ReelsmithError::RenderTimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(status = status.as_u16(), error = %self.0, "Request failed");

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn simple(State(state): State<Arc<AppState>>) -> Result<Json<Plan>, ApiError> {
    Ok(Json(state.orchestrator.generate_plan().await?))
}

async fn tools(State(state): State<Arc<AppState>>) -> Result<Json<AgentRun>, ApiError> {
    Ok(Json(state.orchestrator.run_agent().await?))
}
