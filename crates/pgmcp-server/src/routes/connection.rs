//! Connection registration endpoints.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::json::{ConnectRequest, ConnectResponse, DisconnectRequest, DisconnectResponse};
use crate::AppState;

/// Connection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
}

/// Register a connection string and return its `conn_id`.
async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>> {
    if request.connection_string.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "connection_string must not be empty".to_string(),
        ));
    }
    let conn_id = state.registry.register(&request.connection_string).await?;
    Ok(Json(ConnectResponse { conn_id }))
}

/// Close a registered connection.
async fn disconnect(
    State(state): State<AppState>,
    Json(request): Json<DisconnectRequest>,
) -> Result<Json<DisconnectResponse>> {
    state.registry.disconnect(&request.conn_id).await?;
    Ok(Json(DisconnectResponse { success: true }))
}
