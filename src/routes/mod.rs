// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::MetricsEngine;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<MetricsEngine>,
}

pub fn app(engine: Arc<MetricsEngine>) -> Router {
    let state = AppState { engine };
    Router::new()
        .route("/", get(|| async { "metricsd: sampled system metrics" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/cpu", get(http::cpu_handler))
        .route("/memory", get(http::memory_handler))
        .route("/network", get(http::network_handler))
        .route("/network/rate", get(http::network_rate_handler))
        .route("/disk", get(http::disk_handler))
        .route("/disk/rate", get(http::disk_rate_handler))
        .route("/disk/mounts", get(http::disk_mounts_handler))
        .route("/processes", get(http::processes_handler))
        .route("/system", get(http::system_handler))
        .route("/hardware", get(http::hardware_handler))
        .route("/modules", get(http::modules_handler))
        .route("/meta", get(http::meta_handler))
        .route("/all", get(http::all_handler))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
