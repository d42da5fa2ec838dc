//! Token payload: who the caller is and what they may do.
//!
//! Wire shape (merged with the standard `iat`/`exp` claims):
//! `{"user_id": 42, "employee_id": "E-0042", "roles": "ADMIN", "type": "access"}`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exactly one role per token. Unknown strings fail payload decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Employee,
    Admin,
    /// Attendance kiosk that renders check-in QR codes.
    QrCode,
    /// Read-only statistics screen.
    Dashboard,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Employee, Role::Admin, Role::QrCode, Role::Dashboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Admin => "ADMIN",
            Role::QrCode => "QRCODE",
            Role::Dashboard => "DASHBOARD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and authorization scope of one session.
///
/// Holding a `Claims` value proves nothing by itself. Only values returned by
/// `TokenCodec::validate_token` have been checked against a signature, and only
/// those reach handlers (through `AuthCtx`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(rename = "roles")]
    pub role: Role,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. Must be strictly after `iat`.
    pub exp: i64,
}

impl Claims {
    /// Claims issued now and valid for `ttl_seconds`.
    pub fn new(user_id: i64, role: Role, token_type: TokenType, ttl_seconds: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            user_id,
            employee_id: None,
            role,
            token_type,
            iat,
            exp: iat.saturating_add(ttl_seconds),
        }
    }

    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Moves the issuance time, keeping the lifetime.
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        let ttl = self.exp - self.iat;
        self.iat = iat;
        self.exp = iat.saturating_add(ttl);
        self
    }

    pub fn has_valid_lifetime(&self) -> bool {
        self.exp > self.iat
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
