//
// web.rs
// Crop-Health-rs
//
// Axum-based HTTP server exposing upload, validation, crop health analysis, and catalog lookup APIs.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::{CropEntry, CropType};
use crate::models::AnalysisReport;
use crate::pipeline::{AnalysisRequest, Analyzer};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    analyzer: Arc<Analyzer>,
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Bootstraps the Axum HTTP server and wires up API routes.
pub async fn start_server(host: &str, port: u16, analyzer: Analyzer) -> anyhow::Result<()> {
    let app = router(analyzer);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(%addr, "server listening");
    println!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(analyzer: Analyzer) -> Router {
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/api/crops", get(crops_handler))
        .route("/api/diseases/:crop", get(diseases_handler))
        .route("/api/validate", post(validate_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn root_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn crops_handler() -> Json<Vec<&'static str>> {
    Json(CropType::ALL.iter().map(|c| c.as_str()).collect())
}

async fn diseases_handler(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> ApiResult<Json<CropEntry>> {
    let crop: CropType = crop.parse().map_err(bad_request)?;
    let entry = state.analyzer.catalog().entry(crop).map_err(not_found)?;
    Ok(Json(entry.clone()))
}

async fn validate_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let request = read_upload(multipart).await?;
    let assessment = state.analyzer.validate(&request).await;

    Ok(Json(json!({
        "filename": request.filename,
        "crop": request.crop,
        "valid": assessment.verdict.is_valid,
        "reason": assessment.verdict.reason,
        "rejection": assessment.verdict.rejection,
        "statistics": assessment.statistics()
    })))
}

async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalysisReport>> {
    let request = read_upload(multipart).await?;
    let report = state
        .analyzer
        .analyze(request)
        .await
        .map_err(internal_error)?;
    Ok(Json(report))
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<AnalysisRequest> {
    let mut original_name = None;
    let mut data = None;
    let mut crop = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                original_name = field.file_name().map(|s| s.to_string());
                data = Some(field.bytes().await.map_err(bad_request)?);
            }
            Some("crop") => {
                let text = field.text().await.map_err(bad_request)?;
                crop = Some(text.parse::<CropType>().map_err(bad_request)?);
            }
            _ => {}
        }
    }

    let data = data.ok_or((StatusCode::BAD_REQUEST, "No file uploaded".to_string()))?;
    let crop = crop.ok_or((StatusCode::BAD_REQUEST, "No crop type given".to_string()))?;
    let filename = original_name.unwrap_or_else(|| "upload".to_string());

    Ok(AnalysisRequest::new(data.to_vec(), filename, crop))
}

fn bad_request<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn not_found<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, err.to_string())
}
