use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;
use crate::services::auth::{Role, TokenType};

/// The caller's verified identity, as seen by handlers.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub role: Role,
    pub token_type: TokenType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AuthCtx> for SessionResponse {
    fn from(ctx: &AuthCtx) -> Self {
        Self {
            user_id: ctx.user_id(),
            employee_id: ctx.employee_id().map(str::to_string),
            role: ctx.role(),
            token_type: ctx.token_type(),
            expires_at: ctx.expires_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SigningKeysResponse {
    pub active_kid: String,
    pub kids: Vec<String>,
}
