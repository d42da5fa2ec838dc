/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - 署名検証・ロール判定は middleware/services 側の責務
 * - コンストラクタは crate 内限定 (未検証の Claims から作らせない)
 */

use chrono::{DateTime, Utc};

use crate::services::auth::{Claims, Role, TokenType};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// Only the auth middleware creates this, from claims returned by
/// `TokenCodec::validate_token`.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    claims: Claims,
}

impl AuthCtx {
    pub(crate) fn from_verified(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> i64 {
        self.claims.user_id
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.claims.employee_id.as_deref()
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn token_type(&self) -> TokenType {
        self.claims.token_type
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}
