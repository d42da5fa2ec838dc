use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::services::auth::claims::{Claims, Role, TokenType};
use crate::services::auth::codec::{CodecError, TokenCodec, TokenError};

/// Longest lifetime any issued token may have (one year).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 31_536_000;

fn ttl(seconds: u64) -> Result<i64, CodecError> {
    i64::try_from(seconds)
        .ok()
        .filter(|_| (1..=MAX_TOKEN_TTL_SECONDS).contains(&seconds))
        .ok_or(CodecError::InvalidTokenTtl {
            got: seconds,
            max: MAX_TOKEN_TTL_SECONDS,
        })
}

/// Orchestrates access/refresh token issuance under the active signing key.
///
/// - TokenCodec does the signing and verification.
/// - This service decides lifetimes, token types and which KID signs.
pub struct TokenService {
    codec: Arc<TokenCodec>,
    signing_kid: RwLock<String>,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("signing_kid", &self.signing_kid())
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(
        codec: Arc<TokenCodec>,
        signing_kid: impl Into<String>,
        access_ttl_seconds: u64,
        refresh_ttl_seconds: u64,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            codec,
            signing_kid: RwLock::new(signing_kid.into()),
            access_ttl_seconds: ttl(access_ttl_seconds)?,
            refresh_ttl_seconds: ttl(refresh_ttl_seconds)?,
        })
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    pub fn signing_kid(&self) -> String {
        self.signing_kid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.access_ttl_seconds.unsigned_abs()
    }

    /// Make `kid` the key new tokens are signed with.
    ///
    /// The key must already be in the KeyStore.
    pub fn rotate_signing_key(&self, kid: &str) -> Result<(), TokenError> {
        if !self.codec.key_store().contains(kid) {
            return Err(TokenError::KeyNotFound(kid.to_string()));
        }
        let previous = std::mem::replace(
            &mut *self
                .signing_kid
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            kid.to_string(),
        );
        info!(from = %previous, to = %kid, "signing key rotated");
        Ok(())
    }

    /// Issue a new access + refresh token pair for an authenticated user.
    pub fn issue_token_pair(
        &self,
        user_id: i64,
        employee_id: Option<String>,
        role: Role,
    ) -> Result<IssuedTokenPair, TokenError> {
        let kid = self.signing_kid();

        let mut access = Claims::new(user_id, role, TokenType::Access, self.access_ttl_seconds);
        let mut refresh = Claims::new(user_id, role, TokenType::Refresh, self.refresh_ttl_seconds);
        if let Some(employee_id) = employee_id {
            access = access.with_employee_id(employee_id.clone());
            refresh = refresh.with_employee_id(employee_id);
        }

        let access_token = self.codec.generate_token(&kid, &access)?;
        let refresh_token = self.codec.generate_token(&kid, &refresh)?;

        debug!(user_id, role = %role, kid = %kid, "issued token pair");

        Ok(IssuedTokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.access_token_ttl_seconds(),
        })
    }

    /// Exchange a refresh token for a new pair carrying the same identity.
    pub fn refresh(&self, refresh_token: &str) -> Result<IssuedTokenPair, TokenError> {
        let claims = self.codec.validate_token(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(TokenError::UnexpectedTokenType);
        }

        self.issue_token_pair(claims.user_id, claims.employee_id, claims.role)
    }
}

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug)]
pub struct IssuedTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}
