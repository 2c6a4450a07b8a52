use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenRequest {
    /// Missing is treated like empty and rejected as an invalid URL.
    #[serde(default)]
    pub url: String,
    /// Preferred short code; blank means "generate one".
    #[serde(default)]
    pub custom: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub code: String,
    pub url: String,
    pub hits: u64,
    pub short_url: String,
}
