/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - token error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::TokenError;

/// Message for every token that fails verification. Which check failed is logged, never returned.
pub const INVALID_TOKEN: &str = "invalid or expired token";
pub const EXPECTED_HEADER_FORMAT: &str = "expected authorization header format";
pub const EXPECTED_QUERY_TOKEN: &str = "expected token query parameter";
pub const NOT_ALLOWED: &str = "attempted action is not allowed";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorResponseBody {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            // Issuance problems are server-side (key config, crypto backend).
            TokenError::KeyNotFound(_)
            | TokenError::SigningError(_)
            | TokenError::InvalidLifetime => {
                tracing::error!(error = %e, "token issuance failed");
                AppError::Internal
            }
            _ => {
                tracing::warn!(error = %e, "token rejected");
                AppError::Unauthorized(INVALID_TOKEN)
            }
        }
    }
}
