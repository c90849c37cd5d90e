//! Process-wide configuration, loaded once at startup and never mutated.
//!
//! Both services read the environment (after `.env` via dotenvy) and fall back
//! to local secret files for credentials. Missing credentials are not fatal:
//! the affected routes answer with a fixed error instead.

use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

pub const DEFAULT_GPT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GPT_MODEL: &str = "gpt-3.5-turbo";

const GPT_KEY_ENV: &str = "GPT_API_KEY";
const GPT_KEY_FILE: &str = "gpt-key.txt";
const ENDPOINT_KEY_FILE: &str = "endpointkey.txt";
const PETS_CSV: &str = "pets.csv";

/// Configuration for the Path Pal web service.
#[derive(Debug, Clone)]
pub struct PathPalConfig {
    pub port: u16,
    pub public_dir: PathBuf,
    pub log_dir: PathBuf,
    pub gpt_api_key: Option<String>,
    pub gpt_api_url: String,
    pub gpt_model: String,
}

impl PathPalConfig {
    /// Where logs go, resolved without logging so it can run before the
    /// subscriber exists.
    pub fn log_dir_from_env() -> PathBuf {
        env::var("PATHPAL_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"))
    }

    pub fn load() -> Self {
        let key_file: PathBuf = try_load("GPT_KEY_FILE", GPT_KEY_FILE);
        Self {
            port: try_load("PORT", "3000"),
            public_dir: try_load("PATHPAL_PUBLIC_DIR", "public"),
            log_dir: try_load("PATHPAL_LOG_DIR", "logs"),
            gpt_api_key: resolve_api_key(var(GPT_KEY_ENV).ok(), &key_file),
            gpt_api_url: try_load("GPT_API_URL", DEFAULT_GPT_API_URL),
            gpt_model: try_load("GPT_MODEL", DEFAULT_GPT_MODEL),
        }
    }
}

/// Configuration for the Petfinder CSV distributor.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub csv_path: PathBuf,
    pub log_dir: PathBuf,
    pub endpoint_key: Option<String>,
}

impl DistributorConfig {
    /// `<data dir>/logs`, resolved without logging or touching the disk.
    pub fn log_dir_from_env() -> PathBuf {
        select_data_dir(env::var("PETS_DATA_DIR").ok()).join("logs")
    }

    pub fn load() -> Self {
        let data_dir = resolve_data_dir(var("PETS_DATA_DIR").ok());
        let key_file: PathBuf = try_load("ENDPOINT_KEY_FILE", ENDPOINT_KEY_FILE);
        Self {
            port: try_load("PORT", "5000"),
            csv_path: data_dir.join(PETS_CSV),
            log_dir: data_dir.join("logs"),
            endpoint_key: read_secret_file(&key_file),
            data_dir,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not set");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value ({e}), using default: {default}");
        // Every default above parses for its target type.
        default
            .parse()
            .unwrap_or_else(|_| unreachable!("default for {key} must parse"))
    })
}

/// Environment first, secret file second. Blank values count as absent.
pub fn resolve_api_key(env_value: Option<String>, file: &Path) -> Option<String> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()) {
        if !key.is_empty() {
            info!("Using {GPT_KEY_ENV} from environment");
            return Some(key);
        }
    }
    let key = read_secret_file(file);
    if key.is_none() {
        warn!("No GPT API key configured; /api/chat will answer 500");
    }
    key
}

/// Read a trimmed secret from disk. Missing, unreadable, or empty → `None`.
pub fn read_secret_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => {
            let s = s.trim().to_string();
            if s.is_empty() {
                warn!(path = %path.display(), "Secret file is empty");
                None
            } else {
                info!(path = %path.display(), "Loaded secret from file");
                Some(s)
            }
        }
        Err(e) => {
            warn!(path = %path.display(), "Failed to read secret file: {e}");
            None
        }
    }
}

/// `PETS_DATA_DIR` wins; otherwise a writable `/data` mount; otherwise `data`.
pub fn select_data_dir(explicit: Option<String>) -> PathBuf {
    match explicit.filter(|d| !d.trim().is_empty()) {
        Some(d) => PathBuf::from(d),
        None if is_writable_dir(Path::new("/data")) => PathBuf::from("/data"),
        None => PathBuf::from("data"),
    }
}

/// [`select_data_dir`], then make sure the directory exists.
pub fn resolve_data_dir(explicit: Option<String>) -> PathBuf {
    let dir = select_data_dir(explicit);
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!(dir = %dir.display(), "Failed to create data directory: {e}");
    }
    dir
}

fn is_writable_dir(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}
