// GET handlers for the metric endpoints.
//
// Error mapping: an unknown module name is the caller's fault (400); a
// failed counter read on a single-domain endpoint has no meaningful
// partial result, so it surfaces as 500. Composite endpoints never reach
// the 500 path for module failures — the engine omits the module instead.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::error;

use super::AppState;
use crate::engine::{EngineError, MetaParams, ProcessQuery};
use crate::models::SortKey;
use crate::version::{NAME, VERSION};

pub(super) struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            EngineError::UnknownModule(_) => (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({ "error": self.0.to_string() })),
            )
                .into_response(),
            EngineError::Source(e) => {
                error!("collector failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(serde_json::json!({ "error": "counter source read failed" })),
                )
                    .into_response()
            }
        }
    }
}

/// GET /version — service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CursorQuery {
    cursor: Option<String>,
}

pub(super) async fn cpu_handler(
    State(state): State<AppState>,
    Query(q): Query<CursorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.cpu(q.cursor.as_deref()).await?))
}

pub(super) async fn memory_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.memory().await?))
}

pub(super) async fn network_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.network().await?))
}

pub(super) async fn network_rate_handler(
    State(state): State<AppState>,
    Query(q): Query<CursorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(
        state.engine.network_rates(q.cursor.as_deref()).await?,
    ))
}

pub(super) async fn disk_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.disk().await?))
}

pub(super) async fn disk_rate_handler(
    State(state): State<AppState>,
    Query(q): Query<CursorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(
        state.engine.disk_rates(q.cursor.as_deref()).await?,
    ))
}

pub(super) async fn disk_mounts_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.disk_mounts().await?))
}

/// Signed on the wire so `limit=-1` means unbounded rather than a
/// deserialization failure; the engine's unbounded sentinel is 0.
fn effective_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(l) if l > 0 => l as usize,
        _ => 0,
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProcessesQuery {
    sort_by: Option<SortKey>,
    limit: Option<i64>,
    cursor: Option<String>,
    #[serde(default)]
    disable_cpu: bool,
}

pub(super) async fn processes_handler(
    State(state): State<AppState>,
    Query(q): Query<ProcessesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ProcessQuery {
        sort_by: q.sort_by.unwrap_or_default(),
        limit: effective_limit(q.limit),
        enable_cpu: !q.disable_cpu,
        cursor: q.cursor,
        deadline: None,
    };
    Ok(axum::Json(state.engine.processes(query).await?))
}

pub(super) async fn system_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.system().await?))
}

pub(super) async fn hardware_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(axum::Json(state.engine.hardware().await?))
}

pub(super) async fn modules_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.engine.modules())
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MetaQuery {
    /// Comma-separated module names; `all` expands to every module.
    modules: String,
    sort_by: Option<SortKey>,
    limit: Option<i64>,
    #[serde(default)]
    disable_cpu: bool,
    cpu_cursor: Option<String>,
    proc_cursor: Option<String>,
    net_cursor: Option<String>,
    disk_cursor: Option<String>,
}

pub(super) async fn meta_handler(
    State(state): State<AppState>,
    Query(q): Query<MetaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let modules: Vec<String> = q.modules.split(',').map(|m| m.trim().to_string()).collect();
    let params = MetaParams {
        sort_by: q.sort_by.unwrap_or_default(),
        limit: effective_limit(q.limit),
        enable_cpu: !q.disable_cpu,
        cpu_cursor: q.cpu_cursor,
        proc_cursor: q.proc_cursor,
        net_cursor: q.net_cursor,
        disk_cursor: q.disk_cursor,
    };
    Ok(axum::Json(state.engine.meta(&modules, params).await?))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AllQuery {
    sort_by: Option<SortKey>,
    limit: Option<i64>,
    #[serde(default)]
    disable_cpu: bool,
}

/// GET /all — every module with fresh (cursor-less) sampling.
pub(super) async fn all_handler(
    State(state): State<AppState>,
    Query(q): Query<AllQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let params = MetaParams {
        sort_by: q.sort_by.unwrap_or_default(),
        limit: effective_limit(q.limit),
        enable_cpu: !q.disable_cpu,
        ..Default::default()
    };
    Ok(axum::Json(
        state.engine.meta(&["all".to_string()], params).await?,
    ))
}
