use std::sync::Arc;

use burrow_core::Shortener;

/// Shared state handed to every request handler.
///
/// Holds the process-wide shortener (and through it the store handle); the
/// store closes when the last clone of this state is dropped.
#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: String,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        let base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            shortener,
            base_url,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Public base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
