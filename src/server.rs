//! ==============================================================================
//! server.rs - local surface endpoint
//! ==============================================================================
//!
//! purpose:
//!     the page talks to the monitor through this endpoint:
//!     - GET  /surface                  current element model + notifications
//!     - POST /devices/:device/toggle   user clicked a device button
//!     - POST /lifecycle                visibility / connectivity change
//!     - GET  /health                   liveness
//!
//! relationships:
//!     - uses: monitor.rs (toggle), lifecycle.rs (signals)
//!     - started by: main.rs
//!
//! ==============================================================================

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::domain::DeviceKind;
use crate::lifecycle::LifecycleSignal;
use crate::monitor::RoomMonitor;
use crate::surface::Surface;
use crate::Result;

pub fn router(monitor: RoomMonitor) -> Router {
    Router::new()
        .route("/surface", get(surface_handler))
        .route("/devices/:device/toggle", post(toggle_handler))
        .route("/lifecycle", post(lifecycle_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(monitor)
}

pub async fn run_server(bind: &str, monitor: RoomMonitor) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "surface endpoint listening");
    axum::serve(listener, router(monitor)).await?;
    Ok(())
}

async fn surface_handler(State(monitor): State<RoomMonitor>) -> Json<Surface> {
    Json(monitor.surface().snapshot())
}

/// toggle params come from the path: light|luz|fan|ventilador
async fn toggle_handler(
    State(monitor): State<RoomMonitor>,
    Path(device): Path<String>,
) -> Response {
    match device.parse::<DeviceKind>() {
        Ok(device) => {
            // own task, so a dropped request still settles the command
            let task = tokio::spawn(async move { monitor.toggle(device).await });
            match task.await {
                Ok(outcome) => Json(outcome).into_response(),
                Err(e) => {
                    tracing::error!(error = %e, "toggle task failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({"status": "error", "message": e.to_string()})),
                    )
                        .into_response()
                }
            }
        }
        Err(message) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"status": "error", "message": message})),
        )
            .into_response(),
    }
}

async fn lifecycle_handler(
    State(monitor): State<RoomMonitor>,
    Json(signal): Json<LifecycleSignal>,
) -> StatusCode {
    monitor.handle_signal(signal).await;
    StatusCode::NO_CONTENT
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
