use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::Serialize;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened, already validated by the caller.
    pub original_url: String,
    /// Optional caller-chosen short code.
    pub custom_code: Option<ShortCode>,
}

/// A mapping together with its hit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlStats {
    pub code: ShortCode,
    pub original_url: String,
    pub hits: u64,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Assigns a short code to the URL and persists the mapping.
    ///
    /// Fails with `CodeTaken` if the custom code is already mapped.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Resolves a short code to its URL, counting one hit.
    ///
    /// The hit is best-effort: a failed increment never fails the resolution.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;

    /// Returns the mapping and its hit count without counting a hit.
    async fn stats(&self, code: &ShortCode) -> Result<UrlStats>;
}
