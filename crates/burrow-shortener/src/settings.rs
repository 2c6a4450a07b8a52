use typed_builder::TypedBuilder;

/// Generated-code draws allowed per request before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Tunables for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct ShortenerSettings {
    /// Upper bound on generated-code draws for one request.
    ///
    /// `None` retries until a free code is found. With 62^6 codes the loop
    /// terminates with overwhelming probability long before the code space
    /// fills; the bound only caps worst-case latency.
    #[builder(default = Some(DEFAULT_MAX_ATTEMPTS))]
    pub max_attempts: Option<u32>,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
