use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use burrow_core::ShortCode;

/// Redirects to the original URL with `302 Found`, counting one hit.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(short_code).map_err(|_| AppError::NotFound)?;

    let url = state.shortener().resolve(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
