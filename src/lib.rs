pub mod config;
pub mod distributor;
pub mod error;
pub mod http;
pub mod llm;
pub mod logging;
pub mod pathpal;
pub mod pets;
pub mod session;
pub mod validation;

use std::sync::Arc;

use config::{DistributorConfig, PathPalConfig};
use error::AppError;

fn runtime() -> Result<tokio::runtime::Runtime, AppError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Boot the Path Pal web service and block until it shuts down.
pub fn run_path_pal() -> Result<(), AppError> {
    let log_dir = PathPalConfig::log_dir_from_env();
    let _log_guard = logging::init(&log_dir, "path-pal.log");
    logging::install_crash_hook(&log_dir);

    let config = PathPalConfig::load();

    tracing::info!("Starting Path Pal v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        public_dir = %config.public_dir.display(),
        model = %config.gpt_model,
        key_configured = config.gpt_api_key.is_some(),
        "Configuration loaded"
    );

    let chat = Arc::new(llm::OpenAiChatClient::new(
        config.gpt_api_url.clone(),
        config.gpt_model.clone(),
    )?);
    let port = config.port;
    let app = pathpal::router(pathpal::PathPalState::new(config, chat));

    runtime()?.block_on(http::serve(app, port, "path-pal"))
}

/// Boot the Petfinder CSV distributor and block until it shuts down.
pub fn run_distributor() -> Result<(), AppError> {
    let log_dir = DistributorConfig::log_dir_from_env();
    let _log_guard = logging::init(&log_dir, "distributor.log");
    logging::install_crash_hook(&log_dir);

    let config = DistributorConfig::load();

    tracing::info!("Starting Petfinder distributor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        data_dir = %config.data_dir.display(),
        csv = %config.csv_path.display(),
        "Configuration loaded"
    );

    let port = config.port;
    let app = distributor::router(distributor::DistributorState::from_config(&config));

    runtime()?.block_on(http::serve(app, port, "petfinder-distributor"))
}
