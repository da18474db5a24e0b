use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Prompt too large: {chars} characters (max {max})")]
    PromptTooLarge { chars: usize, max: usize },

    #[error("Chat is not configured on this server")]
    NotConfigured,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Too many chat requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::EmptyPrompt => StatusCode::BAD_REQUEST,
            ProxyError::PromptTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let ProxyError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
