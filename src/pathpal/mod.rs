//! Path Pal web service: static pages, the chat proxy, and a liveness probe.

pub mod chat;
pub mod health;
pub mod pages;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::PathPalConfig;
use crate::llm::ChatBackend;

/// Pages served both as `/<page>.html` and `/<page>`.
pub const PAGES: [&str; 10] = [
    "index",
    "profile",
    "odds",
    "simulator",
    "explorer",
    "career",
    "activities",
    "planner",
    "messages",
    "saved",
];

/// Shared state for the Path Pal HTTP server.
#[derive(Clone)]
pub struct PathPalState {
    pub config: Arc<PathPalConfig>,
    pub chat: Arc<dyn ChatBackend>,
}

impl PathPalState {
    pub fn new(config: PathPalConfig, chat: Arc<dyn ChatBackend>) -> Self {
        Self {
            config: Arc::new(config),
            chat,
        }
    }
}

/// Build the full Path Pal router. Anything not matched by a page route or the
/// API falls through to the public directory as plain static files.
pub fn router(state: PathPalState) -> Router {
    let mut app = Router::new()
        .route("/api/chat", post(chat::handle_chat))
        .route("/health", get(health::health))
        .route("/", pages::page_handler("index"));

    for page in PAGES {
        app = app.route(&format!("/{page}.html"), pages::page_handler(page));
        if page != "index" {
            app = app.route(&format!("/{page}"), pages::page_handler(page));
        }
    }

    let assets = ServeDir::new(&state.config.public_dir);

    app.fallback_service(assets)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
