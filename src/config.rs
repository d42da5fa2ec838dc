/*
 * Responsibility
 * - 環境変数の読み込み (PORT, JWT 鍵, TTL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::{MAX_LEEWAY_SECONDS, MAX_TOKEN_TTL_SECONDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// A verification-only key kept around while tokens signed by it are still alive.
#[derive(Clone, Debug)]
pub struct RetiredKey {
    pub kid: String,
    pub public_key_pem: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_algorithm: String,
    pub jwt_signing_kid: String,
    // Signs tokens issued by this process
    pub jwt_private_key_pem: String,
    pub jwt_public_key_pem: String,
    pub jwt_retired_key: Option<RetiredKey>,
    pub jwt_leeway_seconds: u64,

    // Token lifetimes (seconds)
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,

    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(&get("APP_ENV").unwrap_or_else(|| "development".into()));

        let jwt_algorithm = get("JWT_ALGORITHM").unwrap_or_else(|| "RS256".to_string());
        let jwt_signing_kid = non_empty(&get, "JWT_SIGNING_KID")?;
        let jwt_private_key_pem = pem(&get, "JWT_PRIVATE_KEY_PEM")?;
        let jwt_public_key_pem = pem(&get, "JWT_PUBLIC_KEY_PEM")?;

        let jwt_retired_key = match get("JWT_RETIRED_KID").filter(|s| !s.trim().is_empty()) {
            Some(kid) => {
                if kid == jwt_signing_kid {
                    return Err(ConfigError::Invalid("JWT_RETIRED_KID"));
                }
                Some(RetiredKey {
                    kid,
                    public_key_pem: pem(&get, "JWT_RETIRED_PUBLIC_KEY_PEM")?,
                })
            }
            None => None,
        };

        let jwt_leeway_seconds = bounded(&get, "JWT_LEEWAY_SECONDS", 0, MAX_LEEWAY_SECONDS)?;
        // 1 hour / 7 days
        let access_token_ttl_seconds =
            bounded(&get, "ACCESS_TOKEN_TTL_SECONDS", 3_600, MAX_TOKEN_TTL_SECONDS)?;
        let refresh_token_ttl_seconds =
            bounded(&get, "REFRESH_TOKEN_TTL_SECONDS", 604_800, MAX_TOKEN_TTL_SECONDS)?;
        let request_timeout_seconds = number(&get, "REQUEST_TIMEOUT_SECONDS", 30)?;

        if access_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
        if refresh_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("REFRESH_TOKEN_TTL_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            jwt_algorithm,
            jwt_signing_kid,
            jwt_private_key_pem,
            jwt_public_key_pem,
            jwt_retired_key,
            jwt_leeway_seconds,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            request_timeout_seconds,
        })
    }
}

fn non_empty<F>(get: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

// PEM values in .env files are usually single-line with literal `\n`.
fn pem<F>(get: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(get, key).map(|v| v.replace("\\n", "\n"))
}

fn number<F>(get: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn bounded<F>(get: &F, key: &'static str, default: u64, max: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    number(get, key, default).and_then(|v| {
        if v > max {
            Err(ConfigError::Invalid(key))
        } else {
            Ok(v)
        }
    })
}
