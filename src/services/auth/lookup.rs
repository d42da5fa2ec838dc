//! KID -> public key resolution.
//!
//! The codec never decides where verification keys come from. Anything that can
//! map a key id to a `DecodingKey` (static map, JWKS cache, key files) plugs in
//! through `PublicKeyLookup`.

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::DecodingKey;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown kid: {0}")]
    UnknownKid(String),
    #[error("key backend failure: {0}")]
    Backend(String),
}

pub trait PublicKeyLookup: Send + Sync {
    fn lookup(&self, kid: &str) -> Result<DecodingKey, LookupError>;
}

impl<F> PublicKeyLookup for F
where
    F: Fn(&str) -> Result<DecodingKey, LookupError> + Send + Sync,
{
    fn lookup(&self, kid: &str) -> Result<DecodingKey, LookupError> {
        self(kid)
    }
}

/// Fixed, operator-managed set of verification keys.
#[derive(Clone, Default)]
pub struct StaticKeyLookup {
    keys: HashMap<String, DecodingKey>,
}

impl fmt::Debug for StaticKeyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&String> = self.keys.keys().collect();
        kids.sort();
        f.debug_struct("StaticKeyLookup").field("kids", &kids).finish()
    }
}

impl StaticKeyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: DecodingKey) -> Self {
        self.keys.insert(kid.into(), key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl PublicKeyLookup for StaticKeyLookup {
    fn lookup(&self, kid: &str) -> Result<DecodingKey, LookupError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| LookupError::UnknownKid(kid.to_string()))
    }
}
