//! Client-side auth helper: credential validation, password hashing, calls to
//! the external `/api/auth/*` endpoints, and the locally persisted session.
//!
//! Network and validation failures are returned as `{ "success": false,
//! "error": ... }` values rather than errors, matching what the auth backend
//! itself answers with.

pub mod storage;

use std::sync::Arc;

use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::AppError;
use crate::validation::{require_credentials, require_email, require_password_len};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

pub const USER_ID_KEY: &str = "user_id";
pub const IS_GUEST_KEY: &str = "is_guest";

const SIGNUP_PATH: &str = "/api/auth/signup";
const LOGIN_PATH: &str = "/api/auth/login";
const GENERIC_FAILURE: &str = "An error occurred. Please try again.";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
}

impl AuthClient {
    pub fn new(base_url: &str, storage: Arc<dyn SessionStorage>) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Validation(format!("Invalid auth base URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url,
            storage,
        })
    }

    /// Create an account. Password must be at least six characters.
    pub async fn sign_up(&self, email: &str, password: &str) -> Value {
        let checked = require_credentials(email, password)
            .and_then(|_| require_email(email))
            .and_then(|_| require_password_len(password));
        if let Err(e) = checked {
            return failure(&e.public_message());
        }
        self.submit(SIGNUP_PATH, email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Value {
        let checked = require_credentials(email, password).and_then(|_| require_email(email));
        if let Err(e) = checked {
            return failure(&e.public_message());
        }
        self.submit(LOGIN_PATH, email, password).await
    }

    /// Start a local-only guest session and return its identifier.
    pub fn continue_as_guest(&self) -> Result<String, AppError> {
        let guest_id = generate_guest_id();
        self.set_user_session(&guest_id, true)?;
        tracing::info!(user_id = %guest_id, "Guest session started");
        Ok(guest_id)
    }

    pub fn set_user_session(&self, user_id: &str, is_guest: bool) -> Result<(), AppError> {
        self.storage.set(USER_ID_KEY, user_id)?;
        self.storage
            .set(IS_GUEST_KEY, if is_guest { "true" } else { "false" })
    }

    pub fn get_current_user_id(&self) -> Option<String> {
        self.storage.get(USER_ID_KEY)
    }

    pub fn is_guest(&self) -> bool {
        self.storage.get(IS_GUEST_KEY).as_deref() == Some("true")
    }

    pub fn sign_out(&self) -> Result<(), AppError> {
        self.storage.remove(USER_ID_KEY)?;
        self.storage.remove(IS_GUEST_KEY)
    }

    /// POST the normalized email and password hash; hand back whatever JSON
    /// the backend answered with, whatever its status code.
    async fn submit(&self, path: &str, email: &str, password: &str) -> Value {
        let response = match self.post_credentials(path, email, password).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(path, "Auth request failed: {}", e);
                return failure(GENERIC_FAILURE);
            }
        };

        if response.get("success").and_then(Value::as_bool) == Some(true) {
            if let Some(user_id) = response.get(USER_ID_KEY).and_then(Value::as_str) {
                if let Err(e) = self.set_user_session(user_id, false) {
                    tracing::warn!("Failed to persist session: {}", e);
                }
            }
        }
        response
    }

    async fn post_credentials(&self, path: &str, email: &str, password: &str) -> Result<Value, AppError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| AppError::Internal(format!("Invalid auth URL: {e}")))?;
        let body = json!({
            "email": normalize_email(email),
            "password_hash": hash_password(password),
        });
        let value = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .json::<Value>()
            .await?;
        Ok(value)
    }
}

pub fn failure(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercase hex SHA-256 of the raw password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// `guest_<unix millis>_<9 base36 chars>`
pub fn generate_guest_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("guest_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}
