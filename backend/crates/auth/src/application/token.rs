//! Identity Token Service
//!
//! Stateless one-hour identity tokens (HS256). The token carries the
//! account ID and role; there is no server-side session record, so the
//! claims are the session.
//!
//! The signing secret may be absent: that is a deployment fault, and it
//! surfaces as [`TokenError::MissingSecret`] (a server error) instead of
//! silently issuing unsigned tokens.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_object::{Role, UserId};

/// Token issue/verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No signing secret configured (server misconfiguration)
    #[error("Token signing secret is not configured")]
    MissingSecret,

    /// Signature did not verify
    #[error("Token signature verification failed")]
    InvalidSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is structurally invalid
    #[error("Token is malformed")]
    Malformed,
}

/// Claims embedded in the identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: Uuid,
    /// Role at issue time (authorization uses this without a DB lookup)
    pub role: Role,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// The authenticated caller, as recovered from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Issues and verifies identity tokens
pub struct TokenService {
    keys: Option<(EncodingKey, DecodingKey)>,
    ttl_secs: i64,
}

impl TokenService {
    /// Build from an optional secret and a token lifetime
    pub fn new(secret: Option<&[u8]>, ttl_secs: i64) -> Self {
        let keys = secret.map(|s| (EncodingKey::from_secret(s), DecodingKey::from_secret(s)));
        Self { keys, ttl_secs }
    }

    /// Issue a signed token for the given identity
    pub fn issue(&self, identity: Identity) -> Result<String, TokenError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id.into_uuid(),
            role: identity.role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|_| TokenError::Malformed)
    }

    /// Verify a token and recover the caller's identity
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = jsonwebtoken::decode::<Claims>(token, decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        Ok(Identity::new(
            UserId::from_uuid(data.claims.sub),
            data.claims.role,
        ))
    }
}
