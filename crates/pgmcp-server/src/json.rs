//! JSON request and response types for the HTTP API.

use pgmcp_prompts::{PromptArgument, PromptMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Number of registered connections.
    pub connections: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub connection_string: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub conn_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DisconnectRequest {
    pub conn_id: String,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
}

/// Body of `pg_query` and `pg_explain`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub conn_id: String,
    pub query: String,
    /// Positional parameters for `$1`, `$2`, ...
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Body of `pg_metadata`.
#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub conn_id: String,
    pub sql_query: String,
}

/// One entry of the prompt listing.
#[derive(Debug, Serialize)]
pub struct PromptInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArgument],
}

#[derive(Debug, Serialize)]
pub struct PromptListResponse {
    pub prompts: Vec<PromptInfo>,
}

/// Body of a prompt render request.
///
/// `conn_id` is required for every prompt that embeds the database
/// document; `nl_to_sql` takes `schema_json` instead.
#[derive(Debug, Default, Deserialize)]
pub struct PromptRequest {
    pub conn_id: Option<String>,
    pub nl_query: Option<String>,
    pub sql_query: Option<String>,
    pub schema_json: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: &'static str,
    pub messages: Vec<PromptMessage>,
}
