//! RS256 key management for JWT signing and verification
//!
//! A [`KeyRing`] holds every key pair that may still verify tokens. Exactly
//! one pair is current and signs new tokens. When another pair becomes
//! current, the previous one is stamped with the moment it stopped signing;
//! it keeps verifying until it is retired, which is only allowed once a full
//! refresh TTL has passed since that stamp.

use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use jsonwebtoken::{DecodingKey, EncodingKey};
use kg_shared::config::JwtConfig;

use crate::errors::{DomainError, TokenError};

/// One signing key pair identified by its kid
#[derive(Clone)]
pub struct KeyPair {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Unix seconds at which this pair stopped being current
    superseded_at: Option<i64>,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("kid", &self.kid)
            .field("superseded_at", &self.superseded_at)
            .finish()
    }
}

impl KeyPair {
    /// Loads a key pair from PEM files
    ///
    /// # Arguments
    ///
    /// * `kid` - Key identifier written into token headers
    /// * `private_key_path` - Path to the PEM-encoded RSA private key
    /// * `public_key_path` - Path to the PEM-encoded RSA public key
    pub fn from_files<P: AsRef<Path>>(
        kid: impl Into<String>,
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, DomainError> {
        let private_key_path = private_key_path.as_ref();
        let public_key_path = public_key_path.as_ref();

        let private_key_pem = fs::read(private_key_path).map_err(|e| {
            key_load_error(format!(
                "Failed to read private key {}: {}",
                private_key_path.display(),
                e
            ))
        })?;
        let public_key_pem = fs::read(public_key_path).map_err(|e| {
            key_load_error(format!(
                "Failed to read public key {}: {}",
                public_key_path.display(),
                e
            ))
        })?;

        Self::from_pem(kid, &private_key_pem, &public_key_pem)
    }

    /// Creates a key pair from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(
        kid: impl Into<String>,
        private_key_pem: &str,
        public_key_pem: &str,
    ) -> Result<Self, DomainError> {
        Self::from_pem(kid, private_key_pem.as_bytes(), public_key_pem.as_bytes())
    }

    fn from_pem(
        kid: impl Into<String>,
        private_key_pem: &[u8],
        public_key_pem: &[u8],
    ) -> Result<Self, DomainError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| key_load_error(format!("Invalid private key format: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| key_load_error(format!("Invalid public key format: {}", e)))?;

        Ok(Self {
            kid: kid.into(),
            encoding_key,
            decoding_key,
            superseded_at: None,
        })
    }

    /// Returns the key identifier
    pub fn kid(&self) -> &str {
        &self.kid
    }
}

#[derive(Debug)]
struct RingState {
    keys: Vec<KeyPair>,
    current_kid: String,
}

impl RingState {
    fn find(&self, kid: &str) -> Option<&KeyPair> {
        self.keys.iter().find(|pair| pair.kid == kid)
    }
}

/// Ordered set of non-retired key pairs with one current signer
#[derive(Debug)]
pub struct KeyRing {
    state: RwLock<RingState>,
}

impl KeyRing {
    /// Creates a key ring from loaded pairs
    ///
    /// # Returns
    ///
    /// * `Ok(KeyRing)` - `current_kid` names one of `keys` and kids are unique
    /// * `Err(DomainError)` - Empty set, duplicate kid or unknown current kid
    pub fn new(keys: Vec<KeyPair>, current_kid: &str) -> Result<Self, DomainError> {
        if keys.is_empty() {
            return Err(key_load_error("At least one signing key is required".to_string()));
        }

        for (index, pair) in keys.iter().enumerate() {
            if keys[..index].iter().any(|other| other.kid == pair.kid) {
                return Err(key_load_error(format!("Duplicate key id: {}", pair.kid)));
            }
        }

        if !keys.iter().any(|pair| pair.kid == current_kid) {
            return Err(DomainError::Token(TokenError::UnknownKey {
                kid: current_kid.to_string(),
            }));
        }

        Ok(Self {
            state: RwLock::new(RingState {
                keys,
                current_kid: current_kid.to_string(),
            }),
        })
    }

    /// Loads every configured key id from `keys_dir`
    ///
    /// Expects `{keys_dir}/{kid}_private.pem` and `{keys_dir}/{kid}_public.pem`
    /// for each entry of `key_ids`.
    pub fn from_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let keys = config
            .key_ids
            .iter()
            .map(|kid| {
                let (private_path, public_path) = config.key_paths(kid);
                KeyPair::from_files(kid.as_str(), private_path, public_path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ring = Self::new(keys, &config.current_kid)?;
        tracing::info!(
            kids = ?ring.kids(),
            current_kid = %config.current_kid,
            "Signing keys loaded"
        );
        Ok(ring)
    }

    /// Key id used for new signatures
    pub fn current_kid(&self) -> String {
        self.read().current_kid.clone()
    }

    /// Key ids still valid for verification, in insertion order
    pub fn kids(&self) -> Vec<String> {
        self.read().keys.iter().map(|pair| pair.kid.clone()).collect()
    }

    /// Current kid and a copy of its signing key
    pub(crate) fn signing_key(&self) -> Result<(String, EncodingKey), DomainError> {
        let state = self.read();
        let pair = state.find(&state.current_kid).ok_or_else(|| {
            DomainError::Token(TokenError::UnknownKey {
                kid: state.current_kid.clone(),
            })
        })?;
        Ok((pair.kid.clone(), pair.encoding_key.clone()))
    }

    /// Copy of the verification key for `kid`, if that kid is not retired
    pub(crate) fn decoding_key(&self, kid: &str) -> Option<DecodingKey> {
        self.read().find(kid).map(|pair| pair.decoding_key.clone())
    }

    /// Adds a pair that verifies immediately but does not sign yet
    pub fn insert(&self, pair: KeyPair) -> Result<(), DomainError> {
        let mut state = self.write();
        if state.find(&pair.kid).is_some() {
            return Err(key_load_error(format!("Duplicate key id: {}", pair.kid)));
        }
        tracing::info!(kid = %pair.kid, "Signing key added");
        state.keys.push(pair);
        Ok(())
    }

    /// Makes `kid` the current signer
    ///
    /// The previously current pair is stamped with `now` and stays valid for
    /// verification until [`KeyRing::retire_expired`] removes it.
    pub fn rotate(&self, kid: &str, now: i64) -> Result<(), DomainError> {
        let mut state = self.write();
        if state.current_kid == kid {
            return Ok(());
        }
        if state.find(kid).is_none() {
            return Err(DomainError::Token(TokenError::UnknownKey {
                kid: kid.to_string(),
            }));
        }

        let previous = std::mem::replace(&mut state.current_kid, kid.to_string());
        for pair in state.keys.iter_mut() {
            if pair.kid == previous {
                pair.superseded_at = Some(now);
            } else if pair.kid == kid {
                pair.superseded_at = None;
            }
        }

        tracing::info!(previous_kid = %previous, current_kid = %kid, "Signing key rotated");
        Ok(())
    }

    /// Drops pairs superseded at least `refresh_ttl_seconds` before `now`
    ///
    /// Every token such a pair signed has expired by then. The current pair
    /// and pairs that never signed are kept. Returns the retired kids.
    pub fn retire_expired(&self, refresh_ttl_seconds: i64, now: i64) -> Vec<String> {
        let mut state = self.write();
        let mut retired = Vec::new();

        state.keys.retain(|pair| match pair.superseded_at {
            Some(superseded_at) if now - superseded_at >= refresh_ttl_seconds => {
                retired.push(pair.kid.clone());
                false
            }
            _ => true,
        });

        if !retired.is_empty() {
            tracing::info!(kids = ?retired, "Signing keys retired");
        }
        retired
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key_load_error(message: String) -> DomainError {
    DomainError::Token(TokenError::KeyLoadError { message })
}
