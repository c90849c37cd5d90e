use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Global crash log directory, set during init.
static CRASH_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize tracing with stdout, a daily rolling log file, and Sentry layers.
///
/// - Stdout: compact, human-readable for the dev console
/// - File: `<log_dir>/<file_name>.<date>`, no ANSI colors
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs
/// - Default level: INFO, override via RUST_LOG env
///
/// The returned guard flushes the file writer on drop; keep it alive in `main`.
pub fn init(log_dir: &Path, file_name: &str) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pathpal_lib=debug,tower_http=info"));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("[LOG] Failed to create {}: {}", log_dir.display(), e);
    }
    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    // No-op when Sentry DSN is not configured.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(sentry_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), "Tracing initialized");
    guard
}

/// Install a panic hook that writes crash details to `<log_dir>/crash_logs`
/// before handing over to the previous hook.
pub fn install_crash_hook(log_dir: &Path) {
    let crash_dir = log_dir.join("crash_logs");
    let _ = std::fs::create_dir_all(&crash_dir);
    CRASH_LOG_DIR.set(crash_dir).ok();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(dir) = CRASH_LOG_DIR.get() {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let path = dir.join(format!("crash_{}.log", timestamp));

            let mut report = String::new();
            report.push_str(&format!(
                "=== PATHPAL CRASH REPORT ===\n\
                 Time: {}\n\
                 Version: {}\n\n",
                chrono::Local::now().to_rfc3339(),
                env!("CARGO_PKG_VERSION"),
            ));

            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                report.push_str(&format!("Panic: {}\n", msg));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                report.push_str(&format!("Panic: {}\n", msg));
            } else {
                report.push_str("Panic: <unknown payload>\n");
            }

            if let Some(loc) = info.location() {
                report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ));
            }

            report.push_str(&format!(
                "\nBacktrace:\n{}\n",
                std::backtrace::Backtrace::force_capture()
            ));

            let thread = std::thread::current();
            report.push_str(&format!("\nThread: {:?} (id: {:?})\n", thread.name(), thread.id()));

            let _ = std::fs::write(&path, &report);
            eprintln!("[CRASH] Report written to: {}", path.display());
        }

        prev_hook(info);
    }));

    tracing::info!("Crash hook installed");
}

/// Sentry options shared by both binaries. DSN comes from the runtime
/// environment; absent or unparsable means Sentry stays a no-op.
pub fn sentry_options(service: &'static str) -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|s| s.parse().ok()),
        release: Some(env!("CARGO_PKG_VERSION").into()),
        server_name: Some(service.into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        before_send: Some(std::sync::Arc::new(|mut event| {
            if let Some(ref mut user) = event.user {
                user.email = None;
                user.ip_address = None;
                user.username = None;
            }
            if let Some(ref mut request) = event.request {
                // Chat bodies and endpoint keys never leave the host.
                request.data = None;
                request.query_string = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
