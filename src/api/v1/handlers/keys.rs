use axum::Json;
use axum::extract::State;

use crate::api::v1::dto::session::SigningKeysResponse;
use crate::api::v1::extractors::AuthCtxExtractor;
use crate::state::AppState;

/// GET /admin/keys (ADMIN)
///
/// Key ids only. They already travel in clear text in every token header.
pub async fn list_signing_keys(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<SigningKeysResponse> {
    tracing::info!(user_id = ctx.user_id(), "signing keys listed");
    Json(SigningKeysResponse {
        active_kid: state.auth.signing_kid(),
        kids: state.auth.codec().key_store().kids(),
    })
}
