//! Token verification → role check → AuthCtx を extensions に入れる
//!
//! Per request:
//! extract credential → verify (TokenCodec) → authorize (roles) → inject AuthCtx → next.
//! Every failure short-circuits with 401. There is no retry; the client has to
//! re-authenticate.
//!
//! Two credential sources share the same verification path:
//! - `Authorization: Bearer <token>` header
//! - a query parameter (e.g. `?token=<token>`) for clients that cannot set headers
//!   (kiosk browsers, EventSource)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::{
    AppError, EXPECTED_HEADER_FORMAT, EXPECTED_QUERY_TOKEN, INVALID_TOKEN, NOT_ALLOWED,
};
use crate::services::auth::{Role, TokenCodec, TokenType, authorized};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    BearerHeader,
    QueryParam(&'static str),
}

/// Route-level authentication + role requirement.
///
/// 例：
/// ```ignore
/// let admin = AuthGuard::bearer(codec.clone(), &[Role::Admin]).apply(admin_routes);
/// let kiosk = AuthGuard::query(codec, "token", &[Role::QrCode]).apply(kiosk_routes);
/// ```
#[derive(Clone, Debug)]
pub struct AuthGuard {
    codec: Arc<TokenCodec>,
    source: CredentialSource,
    roles: Arc<[Role]>,
}

impl AuthGuard {
    /// Reads `Authorization: Bearer <token>`. Empty `roles` means any authenticated caller.
    pub fn bearer(codec: Arc<TokenCodec>, roles: &[Role]) -> Self {
        Self {
            codec,
            source: CredentialSource::BearerHeader,
            roles: roles.into(),
        }
    }

    /// Reads the raw token from query parameter `param`.
    pub fn query(codec: Arc<TokenCodec>, param: &'static str, roles: &[Role]) -> Self {
        Self {
            codec,
            source: CredentialSource::QueryParam(param),
            roles: roles.into(),
        }
    }

    /// Install on every route of `router`. Unmatched paths are left alone (404, not 401).
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
        router.route_layer(middleware::from_fn_with_state(self, guard_middleware))
    }

    fn extract_credential(&self, req: &Request<Body>) -> Result<String, AppError> {
        match self.source {
            CredentialSource::BearerHeader => {
                let value = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or(AppError::Unauthorized(EXPECTED_HEADER_FORMAT))?;
                bearer_token(value)
                    .map(str::to_string)
                    .ok_or(AppError::Unauthorized(EXPECTED_HEADER_FORMAT))
            }
            CredentialSource::QueryParam(param) => req
                .uri()
                .query()
                .and_then(|q| query_value(q, param))
                .ok_or(AppError::Unauthorized(EXPECTED_QUERY_TOKEN)),
        }
    }
}

/// `Bearer <token>`: exactly two space-separated parts, scheme case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Some(token)
        }
        _ => None,
    }
}

fn query_value(query: &str, param: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

async fn guard_middleware(
    State(guard): State<AuthGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = guard.extract_credential(&req)?;

    let claims = guard.codec.validate_token(&token).map_err(|err| {
        // The client only ever sees INVALID_TOKEN.
        tracing::warn!(error = %err, source = ?guard.source, "token verification failed");
        AppError::Unauthorized(INVALID_TOKEN)
    })?;

    // Refresh tokens only buy new tokens; they never authorize a request.
    if claims.token_type != TokenType::Access || !authorized(&claims, &guard.roles) {
        tracing::warn!(
            user_id = claims.user_id,
            role = %claims.role,
            token_type = %claims.token_type,
            required = ?guard.roles,
            "attempted action is not allowed"
        );
        return Err(AppError::Unauthorized(NOT_ALLOWED));
    }

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from_verified(claims));

    Ok(next.run(req).await)
}
