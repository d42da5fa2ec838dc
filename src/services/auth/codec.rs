//! Signed token issuance and verification.
//!
//! Tokens are compact JWS: `base64url(header).base64url(payload).base64url(signature)`
//! with `{"typ":"JWT","alg":..,"kid":..}` in the header and `Claims` in the payload.
//!
//! Verification order is fixed:
//! structure -> kid -> key resolution -> algorithm allow-list -> signature -> claims.
//! The allow-list check always runs before any cryptographic work, so a token
//! that names `none` or an HMAC algorithm never reaches a verifier.

use std::str::FromStr;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use crate::services::auth::claims::Claims;
use crate::services::auth::key_store::KeyStore;
use crate::services::auth::lookup::{LookupError, PublicKeyLookup};

/// Upper bound for clock-skew tolerance.
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

/// Startup-time failures. Not recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("symmetric algorithm not allowed: {0:?}")]
    SymmetricAlgorithm(Algorithm),
    #[error("algorithm {allowed:?} is not in the same key family as {signing:?}")]
    IncompatibleAlgorithm {
        signing: Algorithm,
        allowed: Algorithm,
    },
    #[error("invalid {kind} key pem for {algorithm:?}: {source}")]
    InvalidKeyPem {
        kind: &'static str,
        algorithm: Algorithm,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("leeway of {0}s exceeds {max}s", max = MAX_LEEWAY_SECONDS)]
    LeewayTooLarge(u64),
    #[error("token lifetime must be between 1 and {max}s, got {got}")]
    InvalidTokenTtl { got: u64, max: u64 },
}

/// Issuance and verification failures.
///
/// Callers at the transport edge collapse every verification variant into one
/// unauthorized outcome; the variants exist for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no signing key registered for kid {0}")]
    KeyNotFound(String),
    #[error("claims must expire after they are issued")]
    InvalidLifetime,
    #[error("failed to sign token: {0}")]
    SigningError(#[source] jsonwebtoken::errors::Error),

    #[error("malformed token: {0}")]
    MalformedToken(&'static str),
    #[error("token header has no kid")]
    MissingKid,
    #[error("token header kid is not a string")]
    InvalidKidType,
    #[error("public key resolution failed: {0}")]
    KeyResolutionFailed(#[from] LookupError),
    #[error("algorithm not allowed: {0}")]
    DisallowedAlgorithm(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    ExpiredToken,
    #[error("token used before it was issued")]
    NotYetValid,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("unexpected token type")]
    UnexpectedTokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

fn family(alg: Algorithm) -> KeyFamily {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => KeyFamily::Rsa,
        Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
        Algorithm::EdDSA => KeyFamily::Ed,
    }
}

fn parse_asymmetric(name: &str) -> Result<Algorithm, CodecError> {
    let alg =
        Algorithm::from_str(name.trim()).map_err(|_| CodecError::UnknownAlgorithm(name.into()))?;
    if family(alg) == KeyFamily::Hmac {
        return Err(CodecError::SymmetricAlgorithm(alg));
    }
    Ok(alg)
}

/// Parse a private key PEM for `algorithm` (PKCS#1/PKCS#8 RSA, SEC1/PKCS#8 EC, PKCS#8 Ed25519).
pub fn encoding_key_from_pem(algorithm: Algorithm, pem: &str) -> Result<EncodingKey, CodecError> {
    let pem = pem.as_bytes();
    let parsed = match family(algorithm) {
        KeyFamily::Rsa => EncodingKey::from_rsa_pem(pem),
        KeyFamily::Ec => EncodingKey::from_ec_pem(pem),
        KeyFamily::Ed => EncodingKey::from_ed_pem(pem),
        KeyFamily::Hmac => return Err(CodecError::SymmetricAlgorithm(algorithm)),
    };
    parsed.map_err(|source| CodecError::InvalidKeyPem {
        kind: "private",
        algorithm,
        source,
    })
}

/// Parse a public key PEM (SPKI) for `algorithm`.
pub fn decoding_key_from_pem(algorithm: Algorithm, pem: &str) -> Result<DecodingKey, CodecError> {
    let pem = pem.as_bytes();
    let parsed = match family(algorithm) {
        KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem),
        KeyFamily::Ec => DecodingKey::from_ec_pem(pem),
        KeyFamily::Ed => DecodingKey::from_ed_pem(pem),
        KeyFamily::Hmac => return Err(CodecError::SymmetricAlgorithm(algorithm)),
    };
    parsed.map_err(|source| CodecError::InvalidKeyPem {
        kind: "public",
        algorithm,
        source,
    })
}

/// Fields of the token header the codec needs before verification.
#[derive(Debug)]
struct UnverifiedHeader {
    alg: String,
    kid: String,
}

fn decode_header(token: &str) -> Result<UnverifiedHeader, TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::MalformedToken("expected three segments"));
    };
    if header.is_empty() || payload.is_empty() {
        return Err(TokenError::MalformedToken("empty segment"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::MalformedToken("header is not base64url"))?;
    let header: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|_| TokenError::MalformedToken("header is not a json object"))?;

    let alg = match header.get("alg") {
        Some(Value::String(alg)) => alg.clone(),
        _ => return Err(TokenError::MalformedToken("header has no alg")),
    };
    let kid = match header.get("kid") {
        None | Some(Value::Null) => return Err(TokenError::MissingKid),
        Some(Value::String(kid)) => kid.clone(),
        Some(_) => return Err(TokenError::InvalidKidType),
    };

    Ok(UnverifiedHeader { alg, kid })
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            TokenError::DisallowedAlgorithm(e.to_string())
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::InvalidClaims(format!("missing {claim}"))
        }
        ErrorKind::Json(err) => TokenError::InvalidClaims(err.to_string()),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            TokenError::MalformedToken("undecodable segment")
        }
        // Key/crypto level failures: the token does not verify against the resolved key.
        _ => TokenError::InvalidSignature,
    }
}

/// Issues and verifies signed tokens.
///
/// - Signing keys come from the injected `KeyStore`.
/// - Verification keys come from the injected `PublicKeyLookup`.
pub struct TokenCodec {
    algorithm: Algorithm,
    allowed: Vec<Algorithm>,
    leeway_seconds: u64,
    lookup: Arc<dyn PublicKeyLookup>,
    keys: Arc<KeyStore>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("allowed", &self.allowed)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("keys", &self.keys)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(
        algorithm: &str,
        lookup: Arc<dyn PublicKeyLookup>,
        keys: Arc<KeyStore>,
    ) -> Result<Self, CodecError> {
        let algorithm = parse_asymmetric(algorithm)?;
        Ok(Self {
            algorithm,
            allowed: vec![algorithm],
            leeway_seconds: 0,
            lookup,
            keys,
        })
    }

    /// Replace the verification allow-list.
    ///
    /// Every entry must be asymmetric and share the signing algorithm's key family.
    pub fn with_allowed_algorithms<S: AsRef<str>>(
        mut self,
        names: &[S],
    ) -> Result<Self, CodecError> {
        let mut allowed = Vec::with_capacity(names.len());
        for name in names {
            let alg = parse_asymmetric(name.as_ref())?;
            if family(alg) != family(self.algorithm) {
                return Err(CodecError::IncompatibleAlgorithm {
                    signing: self.algorithm,
                    allowed: alg,
                });
            }
            if !allowed.contains(&alg) {
                allowed.push(alg);
            }
        }
        if allowed.is_empty() {
            allowed.push(self.algorithm);
        }
        self.allowed = allowed;
        Ok(self)
    }

    /// Clock-skew tolerance for `exp`/`iat`, in seconds. Zero by default.
    pub fn with_leeway(mut self, seconds: u64) -> Result<Self, CodecError> {
        if seconds > MAX_LEEWAY_SECONDS {
            return Err(CodecError::LeewayTooLarge(seconds));
        }
        self.leeway_seconds = seconds;
        Ok(self)
    }

    pub fn allowed_algorithms(&self) -> &[Algorithm] {
        &self.allowed
    }

    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    pub fn add_key(&self, kid: impl Into<String>, key: EncodingKey) {
        self.keys.add_key(kid, key);
    }

    pub fn remove_key(&self, kid: &str) {
        self.keys.remove_key(kid);
    }

    pub fn generate_token(&self, kid: &str, claims: &Claims) -> Result<String, TokenError> {
        let key = self
            .keys
            .lookup(kid)
            .ok_or_else(|| TokenError::KeyNotFound(kid.to_string()))?;

        if !claims.has_valid_lifetime() {
            return Err(TokenError::InvalidLifetime);
        }

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        header.kid = Some(kid.to_string());

        jsonwebtoken::encode(&header, claims, &key).map_err(|e| {
            tracing::error!(kid = %kid, error = %e, "failed to sign token");
            TokenError::SigningError(e)
        })
    }

    /// Verify `token` and return its claims.
    ///
    /// No claims are returned unless every check passed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token)?;

        let key = self.lookup.lookup(&header.kid)?;

        let alg = Algorithm::from_str(&header.alg)
            .map_err(|_| TokenError::DisallowedAlgorithm(header.alg.clone()))?;
        if !self.allowed.contains(&alg) {
            return Err(TokenError::DisallowedAlgorithm(header.alg));
        }

        let mut validation = Validation::new(alg);
        validation.algorithms = vec![alg];
        validation.leeway = self.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation)
            .map_err(map_jwt_error)?
            .claims;

        if !claims.has_valid_lifetime() {
            return Err(TokenError::InvalidClaims("exp is not after iat".to_string()));
        }
        // Expiry is exclusive: a token is dead at its `exp` second.
        let now = Utc::now().timestamp();
        if claims.exp <= now.saturating_sub_unsigned(self.leeway_seconds) {
            return Err(TokenError::ExpiredToken);
        }
        if claims.iat > now.saturating_add_unsigned(self.leeway_seconds) {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::{Role, TokenType};
    use crate::services::auth::lookup::StaticKeyLookup;

    const RSA1_PRIVATE: &str = include_str!("../../../testdata/rsa1_private.pem");
    const RSA1_PUBLIC: &str = include_str!("../../../testdata/rsa1_public.pem");
    const RSA2_PRIVATE: &str = include_str!("../../../testdata/rsa2_private.pem");
    const RSA2_PUBLIC: &str = include_str!("../../../testdata/rsa2_public.pem");
    const ED_PRIVATE: &str = include_str!("../../../testdata/ed25519_private.pem");
    const ED_PUBLIC: &str = include_str!("../../../testdata/ed25519_public.pem");

    fn rsa_codec() -> TokenCodec {
        let lookup = StaticKeyLookup::new()
            .with_key(
                "k1",
                decoding_key_from_pem(Algorithm::RS256, RSA1_PUBLIC).unwrap(),
            )
            .with_key(
                "k2",
                decoding_key_from_pem(Algorithm::RS256, RSA2_PUBLIC).unwrap(),
            );
        let keys = KeyStore::with_keys([
            (
                "k1",
                encoding_key_from_pem(Algorithm::RS256, RSA1_PRIVATE).unwrap(),
            ),
            (
                "k2",
                encoding_key_from_pem(Algorithm::RS256, RSA2_PRIVATE).unwrap(),
            ),
        ]);
        TokenCodec::new("RS256", Arc::new(lookup), Arc::new(keys)).unwrap()
    }

    fn admin_claims() -> Claims {
        Claims::new(42, Role::Admin, TokenType::Access, 3600).with_employee_id("E-0042")
    }

    fn b64(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    /// Re-assemble `token` with a different header, keeping payload and signature.
    fn with_header(token: &str, header: Value) -> String {
        let (_, rest) = token.split_once('.').unwrap();
        format!("{}.{}", b64(&header), rest)
    }

    #[test]
    fn round_trip() {
        let codec = rsa_codec();
        let claims = admin_claims();

        let token = codec.generate_token("k1", &claims).unwrap();
        let decoded = codec.validate_token(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn header_carries_alg_kid_and_typ() {
        let codec = rsa_codec();
        let token = codec.generate_token("k2", &admin_claims()).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("k2"));
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn unknown_algorithm_fails_construction() {
        let lookup = Arc::new(StaticKeyLookup::new());
        let err = TokenCodec::new("RS999", lookup, Arc::new(KeyStore::new())).unwrap_err();
        assert!(matches!(err, CodecError::UnknownAlgorithm(_)));
    }

    #[test]
    fn symmetric_algorithms_fail_construction() {
        for name in ["HS256", "HS384", "HS512"] {
            let lookup = Arc::new(StaticKeyLookup::new());
            let err = TokenCodec::new(name, lookup, Arc::new(KeyStore::new())).unwrap_err();
            assert!(matches!(err, CodecError::SymmetricAlgorithm(_)), "{name}");
        }
    }

    #[test]
    fn allow_list_rejects_other_key_families() {
        let err = rsa_codec()
            .with_allowed_algorithms(&["RS256", "ES256"])
            .unwrap_err();
        assert!(matches!(err, CodecError::IncompatibleAlgorithm { .. }));

        let err = rsa_codec().with_allowed_algorithms(&["HS256"]).unwrap_err();
        assert!(matches!(err, CodecError::SymmetricAlgorithm(_)));

        let codec = rsa_codec()
            .with_allowed_algorithms(&["RS256", "PS256", "RS256"])
            .unwrap();
        assert_eq!(
            codec.allowed_algorithms(),
            &[Algorithm::RS256, Algorithm::PS256]
        );
    }

    #[test]
    fn unknown_kid_produces_no_token() {
        let codec = rsa_codec();
        let err = codec.generate_token("nope", &admin_claims()).unwrap_err();
        assert!(matches!(err, TokenError::KeyNotFound(kid) if kid == "nope"));
    }

    #[test]
    fn removed_key_can_no_longer_sign() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();

        codec.remove_key("k1");
        codec.remove_key("k1");

        assert!(matches!(
            codec.generate_token("k1", &admin_claims()),
            Err(TokenError::KeyNotFound(_))
        ));
        // Already-issued tokens still verify through the public key lookup.
        assert!(codec.validate_token(&token).is_ok());
    }

    #[test]
    fn non_positive_lifetime_is_rejected_before_signing() {
        let codec = rsa_codec();
        let claims = Claims::new(1, Role::Employee, TokenType::Access, 0);
        assert!(matches!(
            codec.generate_token("k1", &claims),
            Err(TokenError::InvalidLifetime)
        ));
    }

    #[test]
    fn alg_none_is_rejected() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();

        let forged = with_header(&token, serde_json::json!({"alg": "none", "kid": "k1"}));
        let (unsigned, _) = forged.rsplit_once('.').unwrap();
        let unsigned = format!("{unsigned}.");

        for candidate in [forged, unsigned] {
            let err = codec.validate_token(&candidate).unwrap_err();
            assert!(
                matches!(err, TokenError::DisallowedAlgorithm(ref alg) if alg == "none"),
                "{err:?}"
            );
        }
    }

    #[test]
    fn algorithm_outside_allow_list_is_rejected_even_with_valid_signature() {
        // PS256 verifies against the same RSA key, but only RS256 is allowed.
        let lookup = StaticKeyLookup::new().with_key(
            "k1",
            decoding_key_from_pem(Algorithm::RS256, RSA1_PUBLIC).unwrap(),
        );
        let keys = KeyStore::with_keys([(
            "k1",
            encoding_key_from_pem(Algorithm::PS256, RSA1_PRIVATE).unwrap(),
        )]);
        let keys = Arc::new(keys);
        let lookup: Arc<dyn PublicKeyLookup> = Arc::new(lookup);

        let pss = TokenCodec::new("PS256", Arc::clone(&lookup), Arc::clone(&keys)).unwrap();
        let token = pss.generate_token("k1", &admin_claims()).unwrap();
        assert!(pss.validate_token(&token).is_ok());

        let strict = TokenCodec::new("RS256", lookup, keys).unwrap();
        let err = strict.validate_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::DisallowedAlgorithm(ref alg) if alg == "PS256"));
    }

    #[test]
    fn hmac_confusion_is_rejected() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();
        let forged = with_header(&token, serde_json::json!({"alg": "HS256", "kid": "k1"}));

        assert!(matches!(
            codec.validate_token(&forged),
            Err(TokenError::DisallowedAlgorithm(_))
        ));
    }

    #[test]
    fn tampered_payload_fails() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let mut payload: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        payload["roles"] = Value::String("EMPLOYEE".into());
        let tampered = format!("{}.{}.{}", parts[0], b64(&payload), parts[2]);

        assert!(matches!(
            codec.validate_token(&tampered),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn bit_flips_never_yield_claims() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();
        let header_len = token.find('.').unwrap() + 1;

        // Flip one bit in every byte of the payload and signature segments.
        for i in header_len..token.len() {
            let mut bytes = token.clone().into_bytes();
            if bytes[i] == b'.' {
                continue;
            }
            bytes[i] ^= 0x01;
            let Ok(candidate) = String::from_utf8(bytes) else {
                continue;
            };
            let err = codec.validate_token(&candidate).unwrap_err();
            assert!(
                matches!(
                    err,
                    TokenError::InvalidSignature
                        | TokenError::MalformedToken(_)
                        | TokenError::InvalidClaims(_)
                ),
                "byte {i}: {err:?}"
            );
        }
    }

    #[test]
    fn signature_from_another_key_fails() {
        let codec = rsa_codec();
        let token = codec.generate_token("k2", &admin_claims()).unwrap();
        // Claim to be k1 while signed by k2.
        let forged = with_header(
            &token,
            serde_json::json!({"typ": "JWT", "alg": "RS256", "kid": "k1"}),
        );

        assert!(matches!(
            codec.validate_token(&forged),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_structures() {
        let codec = rsa_codec();
        for token in ["", "abc", "a.b", "a.b.c.d", ".b.c", "a..c", "!!!.b.c"] {
            assert!(
                matches!(
                    codec.validate_token(token),
                    Err(TokenError::MalformedToken(_))
                ),
                "{token:?}"
            );
        }
    }

    #[test]
    fn missing_and_non_string_kid() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();

        let no_kid = with_header(&token, serde_json::json!({"alg": "RS256"}));
        assert!(matches!(
            codec.validate_token(&no_kid),
            Err(TokenError::MissingKid)
        ));

        let numeric_kid = with_header(&token, serde_json::json!({"alg": "RS256", "kid": 1}));
        assert!(matches!(
            codec.validate_token(&numeric_kid),
            Err(TokenError::InvalidKidType)
        ));
    }

    #[test]
    fn unresolvable_kid_is_a_resolution_failure() {
        let codec = rsa_codec();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();
        let forged = with_header(&token, serde_json::json!({"alg": "RS256", "kid": "k9"}));

        assert!(matches!(
            codec.validate_token(&forged),
            Err(TokenError::KeyResolutionFailed(LookupError::UnknownKid(_)))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = rsa_codec();
        let now = Utc::now().timestamp();
        let claims =
            Claims::new(1, Role::Employee, TokenType::Access, 3600).with_issued_at(now - 7200);

        let token = codec.generate_token("k1", &claims).unwrap();
        assert!(matches!(
            codec.validate_token(&token),
            Err(TokenError::ExpiredToken)
        ));
    }

    #[test]
    fn leeway_tolerates_small_skew() {
        let codec = rsa_codec().with_leeway(120).unwrap();
        let now = Utc::now().timestamp();

        let lately_expired =
            Claims::new(1, Role::Employee, TokenType::Access, 600).with_issued_at(now - 660);
        let token = codec.generate_token("k1", &lately_expired).unwrap();
        assert!(codec.validate_token(&token).is_ok());

        let slightly_ahead =
            Claims::new(1, Role::Employee, TokenType::Access, 600).with_issued_at(now + 60);
        let token = codec.generate_token("k1", &slightly_ahead).unwrap();
        assert!(codec.validate_token(&token).is_ok());
    }

    #[test]
    fn token_is_expired_at_its_exp_second() {
        let codec = rsa_codec();
        let now = Utc::now().timestamp();

        let at_exp =
            Claims::new(1, Role::Employee, TokenType::Access, 60).with_issued_at(now - 60);
        let token = codec.generate_token("k1", &at_exp).unwrap();
        assert!(matches!(
            codec.validate_token(&token),
            Err(TokenError::ExpiredToken)
        ));

        let just_alive =
            Claims::new(1, Role::Employee, TokenType::Access, 60).with_issued_at(now - 50);
        let token = codec.generate_token("k1", &just_alive).unwrap();
        assert!(codec.validate_token(&token).is_ok());
    }

    #[test]
    fn leeway_is_bounded() {
        assert!(matches!(
            rsa_codec().with_leeway(u64::MAX),
            Err(CodecError::LeewayTooLarge(u64::MAX))
        ));
        assert!(matches!(
            rsa_codec().with_leeway(MAX_LEEWAY_SECONDS + 1),
            Err(CodecError::LeewayTooLarge(_))
        ));

        let codec = rsa_codec().with_leeway(MAX_LEEWAY_SECONDS).unwrap();
        let token = codec.generate_token("k1", &admin_claims()).unwrap();
        assert!(codec.validate_token(&token).is_ok());
    }

    #[test]
    fn future_issued_at_is_rejected_without_leeway() {
        let codec = rsa_codec();
        let now = Utc::now().timestamp();
        let claims =
            Claims::new(1, Role::Employee, TokenType::Access, 3600).with_issued_at(now + 600);

        let token = codec.generate_token("k1", &claims).unwrap();
        assert!(matches!(
            codec.validate_token(&token),
            Err(TokenError::NotYetValid)
        ));
    }

    #[test]
    fn ed25519_round_trip() {
        let lookup = StaticKeyLookup::new().with_key(
            "ed",
            decoding_key_from_pem(Algorithm::EdDSA, ED_PUBLIC).unwrap(),
        );
        let keys = KeyStore::with_keys([(
            "ed",
            encoding_key_from_pem(Algorithm::EdDSA, ED_PRIVATE).unwrap(),
        )]);
        let codec = TokenCodec::new("EdDSA", Arc::new(lookup), Arc::new(keys)).unwrap();

        let claims = Claims::new(9, Role::Dashboard, TokenType::Access, 60);
        let token = codec.generate_token("ed", &claims).unwrap();
        assert_eq!(codec.validate_token(&token).unwrap(), claims);
    }

    #[test]
    fn pem_of_wrong_family_is_rejected() {
        assert!(matches!(
            encoding_key_from_pem(Algorithm::EdDSA, RSA1_PRIVATE),
            Err(CodecError::InvalidKeyPem { kind: "private", .. })
        ));
        assert!(matches!(
            decoding_key_from_pem(Algorithm::HS256, RSA1_PUBLIC),
            Err(CodecError::SymmetricAlgorithm(_))
        ));
    }
}
