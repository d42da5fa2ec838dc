/// Factory: build `TokenService` (and its codec / key store) from application `Config`.
use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::Algorithm;

use crate::config::Config;
use crate::services::auth::codec::{
    CodecError, TokenCodec, decoding_key_from_pem, encoding_key_from_pem,
};
use crate::services::auth::{KeyStore, StaticKeyLookup, TokenService};

pub fn build_token_service(config: &Config) -> Result<Arc<TokenService>, CodecError> {
    let algorithm = Algorithm::from_str(config.jwt_algorithm.trim())
        .map_err(|_| CodecError::UnknownAlgorithm(config.jwt_algorithm.clone()))?;

    let signing_key = encoding_key_from_pem(algorithm, &config.jwt_private_key_pem)?;
    let keys = KeyStore::with_keys([(config.jwt_signing_kid.clone(), signing_key)]);

    let mut lookup = StaticKeyLookup::new().with_key(
        config.jwt_signing_kid.clone(),
        decoding_key_from_pem(algorithm, &config.jwt_public_key_pem)?,
    );
    if let Some(retired) = &config.jwt_retired_key {
        lookup = lookup.with_key(
            retired.kid.clone(),
            decoding_key_from_pem(algorithm, &retired.public_key_pem)?,
        );
    }

    tracing::info!(
        algorithm = ?algorithm,
        signing_kid = %config.jwt_signing_kid,
        verification_keys = lookup.len(),
        "token codec configured"
    );

    let codec = TokenCodec::new(&config.jwt_algorithm, Arc::new(lookup), Arc::new(keys))?
        .with_leeway(config.jwt_leeway_seconds)?;

    Ok(Arc::new(TokenService::new(
        Arc::new(codec),
        config.jwt_signing_kid.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_seconds,
    )?))
}
