use std::io::ErrorKind;
use std::path::Path;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, MethodRouter};

use super::PathPalState;
use crate::error::AppError;

/// GET handler that always serves `<public_dir>/<page>.html`.
pub fn page_handler(page: &'static str) -> MethodRouter<PathPalState> {
    get(move |State(state): State<PathPalState>| async move {
        serve_page(&state.config.public_dir, page).await
    })
}

pub async fn serve_page(public_dir: &Path, page: &str) -> Result<Html<Vec<u8>>, AppError> {
    let path = public_dir.join(format!("{page}.html"));
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Html(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(page, path = %path.display(), "Page file missing");
            Err(AppError::NotFound(format!("Page not found: {page}")))
        }
        Err(e) => Err(e.into()),
    }
}
