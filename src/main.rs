fn main() {
    // Pick up GPT_API_KEY, PORT, etc. from a local .env before anything reads them.
    dotenvy::dotenv().ok();

    // Returns a no-op guard when SENTRY_DSN is absent (local dev).
    let _sentry_guard = sentry::init(pathpal_lib::logging::sentry_options("path-pal"));

    if let Err(e) = pathpal_lib::run_path_pal() {
        tracing::error!("Path Pal exited with error: {}", e);
        eprintln!("path-pal: {e}");
        std::process::exit(1);
    }
}
