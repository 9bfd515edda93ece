//! HTTP Server for the userload API.
//!
//! Provides REST endpoints for triggering imports and following the
//! pipeline logs.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/import`     | Import the configured `CSV_FILE_PATH`    |
//! | POST   | `/api/upload`     | Upload a CSV and import it               |
//! | GET    | `/api/logs`       | SSE stream for real-time pipeline logs   |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, ImportResponse};
use crate::config::AppConfig;
use crate::error::{CsvError, ImportError};
use crate::pipeline::{import_bytes, import_file};

/// Shared handler state: the pool handle plus the process config.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig, pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/import", post(import_configured))
        .route("/api/upload", post(upload_csv))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Userload server running on http://localhost:{}", port);
    println!("   POST /api/import - Import configured CSV_FILE_PATH");
    println!("   POST /api/upload - Upload a CSV file");
    println!("   GET  /api/logs   - SSE log stream");
    println!("   GET  /health     - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "userload",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "import": "POST /api/import",
            "upload": "POST /api/upload",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Import the server-configured CSV file (no request body).
async fn import_configured(
    State(state): State<AppState>,
) -> Result<Json<ImportResponse>, (StatusCode, Json<Value>)> {
    let path = state.config.require_csv_path().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    let summary = import_file(&state.pool, path)
        .await
        .map_err(import_error_response)?;

    Ok(Json(ImportResponse::new(summary.inserted)))
}

/// Upload CSV endpoint
async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("No file provided")),
        )
    })?;

    println!(
        "📄 NEW UPLOAD: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );

    let summary = import_bytes(&state.pool, &bytes)
        .await
        .map_err(import_error_response)?;

    Ok(Json(ImportResponse::new(summary.inserted)))
}

/// Map pipeline errors to HTTP status codes.
///
/// An empty source is the caller's problem (400); everything else that
/// reaches here is a server-side failure (500). The caller always gets
/// one aggregate reason, never partial-success counts.
fn import_error_response(err: ImportError) -> (StatusCode, Json<Value>) {
    eprintln!("❌ Import error: {}", err);
    let status = match &err {
        ImportError::Csv(CsvError::EmptySource) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error_response(&err.to_string())))
}
