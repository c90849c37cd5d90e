use axum::http::HeaderMap;

use crate::error::AppError;

/// Header checked when no `key` query parameter is present.
pub const API_KEY_HEADER: &str = "x-api-key";

const UNAUTHORIZED: &str = "Invalid or missing endpoint key";

/// Decides whether a presented endpoint key grants access.
///
/// Routes only depend on this trait, so the shared-secret check can be
/// replaced without touching handler code.
pub trait KeyVerifier: Send + Sync {
    fn verify(&self, presented: &str) -> bool;
}

/// Exact match against one secret loaded at startup. With no secret
/// configured every key is rejected.
pub struct SharedSecretVerifier {
    secret: Option<String>,
}

impl SharedSecretVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

impl KeyVerifier for SharedSecretVerifier {
    fn verify(&self, presented: &str) -> bool {
        match &self.secret {
            Some(secret) => secret == presented,
            None => false,
        }
    }
}

/// `?key=` wins over the `X-API-Key` header; empty values count as absent.
pub fn presented_key(raw_query: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let from_query = raw_query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "key")
            .map(|(_, v)| v.into_owned())
    });

    from_query.filter(|k| !k.is_empty()).or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
    })
}

pub fn authorize(
    verifier: &dyn KeyVerifier,
    raw_query: Option<&str>,
    headers: &HeaderMap,
) -> Result<(), AppError> {
    match presented_key(raw_query, headers) {
        Some(key) if verifier.verify(&key) => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected request with wrong endpoint key");
            Err(AppError::Unauthorized(UNAUTHORIZED.into()))
        }
        None => Err(AppError::Unauthorized(UNAUTHORIZED.into())),
    }
}
