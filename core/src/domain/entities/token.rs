//! Token entities for JWT-based authentication.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Role, UserRecord};

/// Kind of token, carried in the `typ` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential authorizing API calls
    Access,
    /// Single-use credential exchanged for a new pair
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID), encoded as a decimal string on the wire
    #[serde(with = "subject")]
    pub sub: i64,

    /// User email
    pub email: String,

    /// User role
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Token type
    pub typ: TokenType,

    /// Unique token id, so two tokens minted in the same second differ
    pub jti: String,
}

impl Claims {
    /// Creates claims for `user` valid for `ttl_seconds` from `now`
    pub fn new(
        user: &UserRecord,
        typ: TokenType,
        now: i64,
        ttl_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + ttl_seconds,
            iss: issuer.to_string(),
            aud: audience.to_string(),
            typ,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Identity described by these claims
    pub fn identity(&self) -> UserRecord {
        UserRecord::new(self.sub, self.email.clone(), self.role)
    }

    /// Checks whether the claims have expired at `now` (unix seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

/// Access + refresh token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

/// Serializes the numeric subject as a string, as registered claims expect.
/// Numeric subjects are accepted on input as well.
mod subject {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sub: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&sub.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .parse()
                .map_err(|_| de::Error::custom(format!("subject is not an integer: {}", s))),
        }
    }
}
