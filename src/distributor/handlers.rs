use std::io::ErrorKind;

use axum::body::Body;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::io::ReaderStream;

use super::auth::authorize;
use super::DistributorState;
use crate::error::AppError;

const READ_FAILED: &str = "Failed to read pets data";

/// GET / and GET /health: liveness probe.
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "message": "Petfinder Scraper Server",
    }))
}

/// GET /pets.csv streams the CSV file to an authorized caller.
pub async fn pets_csv(
    State(state): State<DistributorState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    authorize(state.verifier.as_ref(), query.as_deref(), &headers)?;

    let path = state.store.path();
    let file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No pets CSV yet, serving empty body");
            return Ok(([(header::CONTENT_TYPE, "text/csv")], "").into_response());
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "Error opening pets CSV: {}", e);
            return Err(AppError::Internal(READ_FAILED.into()));
        }
    };

    tracing::info!(path = %path.display(), "Serving pets CSV");
    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=pets.csv"),
        ],
        body,
    )
        .into_response())
}

/// GET /pets returns the same data as JSON, one object per row keyed by the
/// file's header, values untouched.
pub async fn pets_json(
    State(state): State<DistributorState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    authorize(state.verifier.as_ref(), query.as_deref(), &headers)?;

    let store = state.store.clone();
    let loaded = tokio::task::spawn_blocking(move || store.load_rows())
        .await
        .map_err(|e| AppError::Internal(format!("pets loader panicked: {e}")))
        .and_then(|r| r);

    match loaded {
        Ok(Some(pets)) => Ok(Json(serde_json::json!({
            "count": pets.len(),
            "pets": pets,
        }))
        .into_response()),
        Ok(None) => Ok(Json(serde_json::json!({
            "error": "No pets data available",
            "pets": [],
        }))
        .into_response()),
        Err(e) => {
            tracing::error!("Error reading pets CSV: {}", e);
            Err(AppError::Internal(READ_FAILED.into()))
        }
    }
}
