// src/web.rs

use axum::{
    routing::{get, put},
    Router, Json, extract::{Query, State},
    response::{IntoResponse, Response},
    http::StatusCode,
};
use crate::directory_service::{DirectoryError, DirectoryService};
use crate::models::DirectorySnapshot;
use std::sync::Arc;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct HierarchyQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub dn: String,
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::InvalidDn(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

async fn get_hierarchy(
    State(service): State<Arc<DirectoryService>>,
    Query(query): Query<HierarchyQuery>,
) -> impl IntoResponse {
    match query.search.as_deref() {
        Some(term) => Json(service.search(term).await).into_response(),
        None => Json(service.view().await.as_ref().clone()).into_response(),
    }
}

async fn get_stats(
    State(service): State<Arc<DirectoryService>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, DirectoryError> {
    let stats = service.container_stats(&query.dn).await?;
    Ok(Json(stats))
}

async fn put_snapshot(
    State(service): State<Arc<DirectoryService>>,
    Json(snapshot): Json<DirectorySnapshot>,
) -> impl IntoResponse {
    let summary = service.replace_snapshot(snapshot).await;
    (StatusCode::OK, Json(summary))
}

pub fn create_router(service: Arc<DirectoryService>) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/hierarchy", get(get_hierarchy))
        .route("/api/hierarchy/stats", get(get_stats))
        .route("/api/snapshot", put(put_snapshot))
        .with_state(service)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run_web_server(service: Arc<DirectoryService>, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "🌐 Web API запущен");

    axum::serve(listener, app).await?;
    Ok(())
}
