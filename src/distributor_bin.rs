fn main() {
    dotenvy::dotenv().ok();

    // Returns a no-op guard when SENTRY_DSN is absent (local dev).
    let _sentry_guard =
        sentry::init(pathpal_lib::logging::sentry_options("petfinder-distributor"));

    if let Err(e) = pathpal_lib::run_distributor() {
        tracing::error!("Distributor exited with error: {}", e);
        eprintln!("petfinder-distributor: {e}");
        std::process::exit(1);
    }
}
