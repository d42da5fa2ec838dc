use axum::Json;

use crate::api::v1::dto::session::SessionResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

/// GET /session and GET /kiosk/session
pub async fn current_session(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<SessionResponse> {
    tracing::debug!(user_id = ctx.user_id(), role = %ctx.role(), "session lookup");
    Json(SessionResponse::from(&ctx))
}
