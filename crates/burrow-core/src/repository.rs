use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// A read-only view of the mapping store.
///
/// Covers both key spaces: the code-to-URL mappings and the per-code hit
/// counters.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the original URL for a given short code.
    /// Returns `Err(NotFound)` if the code has no mapping.
    async fn get(&self, code: &ShortCode) -> Result<String>;

    /// Checks whether a short code already has a mapping.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns the hit count for a short code, `0` if it was never hit.
    async fn hits(&self, code: &ShortCode) -> Result<u64>;
}

/// The mapping store.
///
/// Every mutating operation is atomic with respect to concurrent callers and
/// durable before it returns `Ok`.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts or overwrites the mapping for `code`.
    async fn save(&self, code: &ShortCode, url: &str) -> Result<()>;

    /// Inserts the mapping only if `code` is unmapped, as one transaction.
    /// Returns `Err(Conflict)` and leaves the stored URL untouched otherwise.
    async fn insert(&self, code: &ShortCode, url: &str) -> Result<()>;

    /// Adds one to the hit counter of `code` and returns the new count.
    async fn increment_hit(&self, code: &ShortCode) -> Result<u64>;
}

#[async_trait]
impl<R: ReadRepository + ?Sized> ReadRepository for Arc<R> {
    async fn get(&self, code: &ShortCode) -> Result<String> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn hits(&self, code: &ShortCode) -> Result<u64> {
        (**self).hits(code).await
    }
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn save(&self, code: &ShortCode, url: &str) -> Result<()> {
        (**self).save(code, url).await
    }

    async fn insert(&self, code: &ShortCode, url: &str) -> Result<()> {
        (**self).insert(code, url).await
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<u64> {
        (**self).increment_hit(code).await
    }
}
