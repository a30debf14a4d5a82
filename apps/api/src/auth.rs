use axum::http::HeaderMap;

use crate::config::Config;
use crate::errors::AppError;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Static shared-secret gate for the curation surface: the presented
/// header must equal the configured passkey. Single-admin model.
pub fn require_admin(headers: &HeaderMap, config: &Config) -> Result<(), AppError> {
    let presented = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if presented.is_empty() || presented != config.admin_passkey {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
