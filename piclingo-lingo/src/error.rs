use piclingo_core::PipelineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response from translation service: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, TranslateError>;

impl From<TranslateError> for PipelineError {
    fn from(err: TranslateError) -> Self {
        PipelineError::Translation(err.to_string())
    }
}
