//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the short code type, the error taxonomy and the
//! contracts shared by the storage backends, the assignment service and the
//! HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{GeneratorError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ShortenParams, Shortener, UrlStats};
