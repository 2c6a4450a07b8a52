use url::Url;

use crate::error::AppError;

/// First path segments owned by fixed routes. A mapping under one of these
/// could never be reached through the redirect route.
pub const RESERVED_CODES: &[&str] = &["healthz", "api"];

/// Accepts absolute `http`/`https` URLs with a non-empty host.
pub fn validate_url(raw: &str) -> Result<(), AppError> {
    let parsed = Url::parse(raw).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl(
            "scheme must be http or https".to_string(),
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidUrl("missing host".to_string()));
    }

    Ok(())
}

/// Rejects custom codes that collide with the router's fixed paths.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if RESERVED_CODES.contains(&code) {
        return Err(AppError::InvalidShortCode(format!("'{code}' is reserved")));
    }

    Ok(())
}
