use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse, UrlResponse};
use crate::state::AppState;
use crate::validate::{validate_custom_code, validate_url};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use burrow_core::{ShortCode, ShortenParams};

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::InvalidJson(e.body_text()))?;

    validate_url(&request.url)?;

    let custom_code = request
        .custom
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            validate_custom_code(code)?;
            ShortCode::new(code).map_err(AppError::from)
        })
        .transpose()?;

    let code = state
        .shortener()
        .shorten(ShortenParams {
            original_url: request.url.clone(),
            custom_code,
        })
        .await?;

    let response = ShortenResponse {
        short_url: code.to_url(state.base_url()),
        code: code.into_string(),
        original_url: request.url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>> {
    // Nothing that fails validation can have been stored.
    let code = ShortCode::new(short_code).map_err(|_| AppError::NotFound)?;

    let stats = state.shortener().stats(&code).await?;

    Ok(Json(UrlResponse {
        short_url: stats.code.to_url(state.base_url()),
        code: stats.code.into_string(),
        url: stats.original_url,
        hits: stats.hits,
    }))
}
