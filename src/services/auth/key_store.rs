use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use jsonwebtoken::EncodingKey;

/// Private signing keys by key id (KID).
///
/// - Several keys may coexist while a rotation is in progress.
/// - Every critical section is a single map operation, so a lookup never sees a
///   half-written entry. Signing happens on a cloned key outside the lock.
#[derive(Default)]
pub struct KeyStore {
    keys: RwLock<HashMap<String, EncodingKey>>,
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("KeyStore")
            .field("kids", &self.kids())
            .finish()
    }
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, EncodingKey)>,
        K: Into<String>,
    {
        let keys = keys.into_iter().map(|(kid, key)| (kid.into(), key)).collect();
        Self {
            keys: RwLock::new(keys),
        }
    }

    /// Inserts or overwrites the key for `kid`.
    pub fn add_key(&self, kid: impl Into<String>, key: EncodingKey) {
        let kid = kid.into();
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kid.clone(), key);
        tracing::info!(kid = %kid, "signing key added");
    }

    /// Removes the key for `kid`. Absent keys are ignored.
    ///
    /// Tokens already signed with it stay verifiable for as long as the public
    /// key lookup still resolves `kid`.
    pub fn remove_key(&self, kid: &str) {
        let removed = self
            .keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(kid)
            .is_some();
        if removed {
            tracing::info!(kid = %kid, "signing key removed");
        }
    }

    pub fn lookup(&self, kid: &str) -> Option<EncodingKey> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kid)
            .cloned()
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kid)
    }

    /// Registered key ids, sorted.
    pub fn kids(&self) -> Vec<String> {
        let mut kids: Vec<String> = self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        kids.sort();
        kids
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
