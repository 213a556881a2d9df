//! Prompt listing and rendering endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use pgmcp_prompts::{PromptContext, PromptKind};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::json::{PromptInfo, PromptListResponse, PromptRequest, PromptResponse};
use crate::tools;
use crate::AppState;

/// Prompt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(list_prompts))
        .route("/prompts/:name", post(render_prompt))
}

async fn list_prompts(State(state): State<AppState>) -> Json<PromptListResponse> {
    let prompts = state
        .prompts
        .prompts()
        .map(|kind| PromptInfo {
            name: kind.name(),
            description: kind.description(),
            arguments: kind.arguments(),
        })
        .collect();
    Json(PromptListResponse { prompts })
}

/// Render a prompt, filling `database_info` (and `query_metadata` for
/// `generate_vega`) from the registered connection.
async fn render_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>> {
    let kind: PromptKind = name.parse()?;

    let mut context = PromptContext {
        nl_query: request.nl_query,
        sql_query: request.sql_query,
        schema_json: request.schema_json,
        ..PromptContext::default()
    };

    // Reject missing caller arguments before touching the database.
    kind.check_user_arguments(&context)?;

    if kind.needs_database_info() {
        let conn_id = request.conn_id.ok_or_else(|| {
            AppError::InvalidRequest(format!("prompt {} requires conn_id", kind))
        })?;
        let mut conn = state.registry.get(&conn_id)?.acquire().await?;

        let database = state.introspector.get_database(&mut conn).await?;
        context.database_info = Some(serde_json::to_string_pretty(&database)?);

        if kind.needs_query_metadata() {
            if let Some(sql) = context.get("sql_query").map(str::to_string) {
                let metadata =
                    tools::collect_metadata(&mut conn, &sql, state.config.statement_timeout)
                        .await
                        .map_err(AppError::from_query)?;
                context.query_metadata = Some(serde_json::to_string_pretty(&metadata)?);
            }
        }
    }

    let messages = state.prompts.render(kind, &context)?;
    debug!(prompt = %kind, messages = messages.len(), "rendered prompt");

    Ok(Json(PromptResponse {
        prompt: kind.name(),
        messages,
    }))
}
