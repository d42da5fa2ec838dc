use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::v1::dto::token::{RefreshRequest, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// POST /auth/refresh
///
/// Exchanges a refresh token for a new access + refresh pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::InvalidRequest(msg.to_string()))?;

    let pair = state.auth.refresh(req.refresh_token.trim())?;

    Ok((StatusCode::OK, Json(pair.into())))
}
