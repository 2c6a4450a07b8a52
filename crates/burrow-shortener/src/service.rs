use crate::settings::ShortenerSettings;
use async_trait::async_trait;
use burrow_core::{
    Repository, ShortCode, ShortenParams, Shortener, ShortenerError, StorageError, UrlStats,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Custom codes, rejected with `CodeTaken` when already mapped
/// - Generated codes, redrawn until an unused one is found
/// - Resolution with a best-effort hit counter
///
/// Mappings are committed with the repository's insert-if-absent primitive,
/// so two requests racing for the same code cannot both succeed. The
/// `exists` pre-check only saves a write transaction in the common case.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    async fn claim_custom(&self, code: ShortCode, url: &str) -> Result<ShortCode> {
        if self.repository.exists(&code).await? {
            debug!(code = %code, "custom code already taken");
            return Err(ShortenerError::CodeTaken(code.into_string()));
        }

        // A conflict here means another request claimed the code after the
        // pre-check; it converts to `CodeTaken` like the pre-check does.
        self.repository.insert(&code, url).await?;
        Ok(code)
    }

    async fn claim_generated(&self, url: &str) -> Result<ShortCode> {
        let mut attempts: u32 = 0;

        loop {
            if let Some(max) = self.settings.max_attempts {
                if attempts >= max {
                    warn!(attempts, "no free short code found");
                    return Err(ShortenerError::Exhausted { attempts });
                }
            }
            attempts = attempts.saturating_add(1);

            let code = self.generator.generate()?;

            if self.repository.exists(&code).await? {
                trace!(code = %code, attempts, "generated code collides, redrawing");
                continue;
            }

            match self.repository.insert(&code, url).await {
                Ok(()) => {
                    trace!(code = %code, attempts, "claimed generated code");
                    return Ok(code);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempts, "generated code claimed concurrently, redrawing");
                }
                Err(other) => return Err(other.into()),
            }
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode> {
        let custom_code = params
            .custom_code
            .filter(|code| !code.as_str().is_empty());

        let code = match custom_code {
            Some(code) => self.claim_custom(code, &params.original_url).await?,
            None => self.claim_generated(&params.original_url).await?,
        };

        debug!(code = %code, url = %params.original_url, "created mapping");
        Ok(code)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String> {
        let url = self.repository.get(code).await?;

        // Losing a view is acceptable, failing the redirect is not.
        if let Err(error) = self.repository.increment_hit(code).await {
            warn!(code = %code, error = %error, "failed to count hit");
        }

        trace!(code = %code, url = %url, "resolved short code");
        Ok(url)
    }

    async fn stats(&self, code: &ShortCode) -> Result<UrlStats> {
        let original_url = self.repository.get(code).await?;
        let hits = self.repository.hits(code).await?;

        Ok(UrlStats {
            code: code.clone(),
            original_url,
            hits,
        })
    }
}
