//! Key-gated download server for the scraped pets CSV.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::config::DistributorConfig;
use crate::pets::PetStore;
use auth::{KeyVerifier, SharedSecretVerifier};

/// Shared state for the distributor HTTP server.
#[derive(Clone)]
pub struct DistributorState {
    pub store: PetStore,
    pub verifier: Arc<dyn KeyVerifier>,
}

impl DistributorState {
    pub fn new(store: PetStore, verifier: Arc<dyn KeyVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Default wiring: the configured CSV path behind the shared endpoint key.
    pub fn from_config(config: &DistributorConfig) -> Self {
        if config.endpoint_key.is_none() {
            tracing::warn!("No endpoint key configured; every download will be rejected");
        }
        Self::new(
            PetStore::new(&config.csv_path),
            Arc::new(SharedSecretVerifier::new(config.endpoint_key.clone())),
        )
    }
}

pub fn router(state: DistributorState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::index))
        .route("/pets.csv", get(handlers::pets_csv))
        .route("/pets", get(handlers::pets_json))
        .with_state(state)
}
