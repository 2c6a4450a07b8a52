//! HTTP gateway for the Burrow URL shortener.
//!
//! Exposes shortening, stats lookup and redirects over a JSON API. All
//! storage and code assignment is delegated to a [`Shortener`].
//!
//! [`Shortener`]: burrow_core::Shortener

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod validate;

pub use app::{App, RouterSettings};
pub use error::AppError;
pub use state::AppState;
