use serde::{Deserialize, Serialize};

use crate::services::auth::IssuedTokenPair;

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl RefreshRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.refresh_token.trim().is_empty() {
            return Err("refresh_token is required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    pub refresh_token: String,
}

impl From<IssuedTokenPair> for TokenResponse {
    fn from(pair: IssuedTokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            token_type: pair.token_type.to_string(),
            expires_in: pair.expires_in,
            refresh_token: pair.refresh_token,
        }
    }
}
