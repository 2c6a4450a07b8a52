//! Short code assignment and resolution.
//!
//! [`ShortenerService`] composes a [`Repository`](burrow_core::Repository)
//! with a [`Generator`](burrow_generator::Generator): it claims custom codes,
//! draws random codes until a free one is found, and resolves codes while
//! counting hits.

pub mod service;
pub mod settings;

pub use burrow_core::{ShortenParams, Shortener, ShortenerError, UrlStats};
pub use service::ShortenerService;
pub use settings::{ShortenerSettings, DEFAULT_MAX_ATTEMPTS};
