use axum::{
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use hyper::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::blobs::{resolve_images, BlobStore};
use crate::config::ReportConfig;
use crate::domain::{RawDocument, ShipmentRecord};
use crate::engine;
use crate::engine::filter::FilterQuery;
use crate::engine::sort::SortKey;
use crate::error::TrackerError;
use crate::storage::RecordStore;

/// Shared server state: the store and blob seams plus the immutable
/// report configuration, passed explicitly rather than read from globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub reports: ReportConfig,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "waretrack",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    search: Option<String>,
    status: Option<String>,
    origin: Option<String>,
    sort: Option<String>,
}

fn error_response(e: TrackerError) -> (StatusCode, String) {
    let status = match &e {
        TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::Http(_) | TrackerError::Store { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

async fn fetch_snapshot(
    state: &AppState,
) -> Result<Vec<ShipmentRecord>, (StatusCode, String)> {
    let documents = state.store.fetch_all().await.map_err(error_response)?;
    Ok(documents.iter().map(engine::normalize).collect())
}

/// Full list view: fetch-all, normalize, filter, stable-sort. Re-invoked
/// per request; nothing is cached between calls.
async fn list_shipments(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ShipmentRecord>>, (StatusCode, String)> {
    let records = fetch_snapshot(&state).await?;

    let query = FilterQuery {
        text: params.search.unwrap_or_default(),
        status: params.status.unwrap_or_else(|| "all".to_string()),
        origin: params.origin.unwrap_or_else(|| "all".to_string()),
    };
    let mut filtered: Vec<ShipmentRecord> = records
        .into_iter()
        .filter(|r| engine::matches(r, &query))
        .collect();

    let sort_key = params
        .sort
        .as_deref()
        .and_then(SortKey::parse)
        .unwrap_or_default();
    engine::sort_records(&mut filtered, sort_key, Utc::now());

    Ok(Json(filtered))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShipmentDetail {
    #[serde(flatten)]
    record: ShipmentRecord,
    image_urls: Vec<String>,
}

async fn get_shipment(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentDetail>, (StatusCode, String)> {
    let doc = state
        .store
        .fetch(&id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(TrackerError::NotFound(id)))?;

    let record = engine::normalize(&doc);
    let image_urls = resolve_images(state.blobs.clone(), &record.images).await;
    Ok(Json(ShipmentDetail { record, image_urls }))
}

async fn create_shipment(
    Extension(state): Extension<AppState>,
    Json(doc): Json<RawDocument>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let id = state.store.create(doc).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

async fn update_shipment(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(doc): Json<RawDocument>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.store.update(&id, doc).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_shipment(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.store.delete(&id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flat projection for the export collaborator, input order preserved.
async fn export_shipments(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<engine::FlatRecord>>, (StatusCode, String)> {
    let records = fetch_snapshot(&state).await?;
    Ok(Json(engine::flatten(&records)))
}

async fn report_summary(
    Extension(state): Extension<AppState>,
) -> Result<Json<engine::ReportSummary>, (StatusCode, String)> {
    let records = fetch_snapshot(&state).await?;
    Ok(Json(engine::summarize(&records)))
}

async fn report_status_distribution(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = fetch_snapshot(&state).await?;
    Ok(Json(engine::status_distribution(&records)))
}

#[derive(Debug, Default, Deserialize)]
struct TopDestinationParams {
    limit: Option<usize>,
}

async fn report_top_destinations(
    Extension(state): Extension<AppState>,
    Query(params): Query<TopDestinationParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = fetch_snapshot(&state).await?;
    let limit = params.limit.unwrap_or(state.reports.top_destinations);
    Ok(Json(engine::top_destinations(&records, limit)))
}

/// Create the HTTP server with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/shipments", get(list_shipments).post(create_shipment))
        .route("/api/shipments/export", get(export_shipments))
        .route(
            "/api/shipments/:id",
            get(get_shipment).put(update_shipment).delete(delete_shipment),
        )
        .route("/api/reports/summary", get(report_summary))
        .route(
            "/api/reports/status-distribution",
            get(report_status_distribution),
        )
        .route(
            "/api/reports/top-destinations",
            get(report_top_destinations),
        )
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server listening on {}", addr);
    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("📦 Shipments:    http://localhost:{port}/api/shipments");
    println!("📊 Reports:      http://localhost:{port}/api/reports/summary");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
