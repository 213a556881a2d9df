//! pgmcp HTTP server.
//!
//! Exposes PostgreSQL catalog introspection, read-only query tools and LLM
//! prompt rendering over HTTP/JSON. Clients register a connection string,
//! receive a `conn_id`, and address every later request to it:
//!
//! - `POST /connect`, `POST /disconnect`
//! - `GET /pgmcp/:conn_id/...` database, schema, table and materialized view documents
//! - `POST /tools/pg_query`, `/tools/pg_explain`, `/tools/pg_metadata`
//! - `GET /prompts`, `POST /prompts/:name`

pub mod config;
pub mod error;
pub mod json;
pub mod registry;
pub mod routes;
pub mod tools;

pub use config::{Args, ServerConfig};
pub use error::AppError;
pub use registry::{cleanup_task, ConnectionRegistry};

use std::sync::Arc;

use axum::Router;
use pgmcp_catalog::Introspector;
use pgmcp_prompts::{PromptError, PromptLibrary};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Registered connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Compiled prompt templates.
    pub prompts: Arc<PromptLibrary>,
    /// Catalog query runner.
    pub introspector: Introspector,
    /// Server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ServerConfig) -> Result<Self, PromptError> {
        Ok(Self {
            registry: Arc::new(ConnectionRegistry::new(config.clone())),
            prompts: Arc::new(PromptLibrary::new()?),
            introspector: Introspector::new().with_row_counts(config.row_counts),
            config,
        })
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::connection::routes())
        .merge(routes::resources::routes())
        .merge(routes::tools::routes())
        .merge(routes::prompts::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
