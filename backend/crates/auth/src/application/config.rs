//! Auth Configuration
//!
//! Two independent secrets:
//! - `token_secret` signs the identity token itself. It is optional so a
//!   misconfigured deployment fails with a 500 at issue/verify time
//!   rather than at startup with a panic.
//! - `cookie_secret` signs the cookie envelope around the token.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use platform::cookie::{CookieConfig, SameSite};

/// Default session lifetime: one hour, for both token and cookie
pub const SESSION_TTL_SECS: i64 = 3600;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "x-auth-token";

/// Auth module configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing secret; `None` means issuing/verifying fails server-side
    pub token_secret: Option<Vec<u8>>,
    /// Cookie envelope signing secret
    pub cookie_secret: [u8; 32],
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Cookie attributes (name, flags, Max-Age)
    pub cookie: CookieConfig,
}

impl AuthConfig {
    /// Build a config with the given secrets and default cookie attributes
    pub fn new(token_secret: Option<Vec<u8>>, cookie_secret: [u8; 32]) -> Self {
        Self {
            token_secret,
            cookie_secret,
            token_ttl_secs: SESSION_TTL_SECS,
            cookie: CookieConfig {
                name: SESSION_COOKIE_NAME.to_string(),
                secure: true,
                http_only: true,
                same_site: SameSite::Strict,
                path: "/".to_string(),
                domain: None,
                max_age_secs: Some(SESSION_TTL_SECS),
            },
        }
    }

    /// Read secrets from the environment
    ///
    /// `JWT_SECRET` and `COOKIE_SECRET` are base64-encoded. A missing or
    /// malformed `JWT_SECRET` leaves `token_secret` as `None`; the server
    /// still starts but every session operation reports a server error.
    /// `COOKIE_SECRET` falls back to a random per-process value, which
    /// invalidates outstanding cookies across restarts.
    pub fn from_env() -> Self {
        let token_secret = std::env::var("JWT_SECRET")
            .ok()
            .and_then(|raw| BASE64.decode(raw.trim()).ok())
            .filter(|bytes| !bytes.is_empty());

        let cookie_secret = std::env::var("COOKIE_SECRET")
            .ok()
            .and_then(|raw| BASE64.decode(raw.trim()).ok())
            .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
            .unwrap_or_else(platform::crypto::random_array::<32>);

        let mut config = Self::new(token_secret, cookie_secret);

        if let Ok(domain) = std::env::var("COOKIE_DOMAIN") {
            let domain = domain.trim().to_string();
            if !domain.is_empty() {
                config.cookie.domain = Some(domain);
            }
        }

        config
    }

    /// Config with random secrets for local development and tests
    pub fn with_random_secrets() -> Self {
        let token_secret = platform::crypto::random_bytes(32);
        let cookie_secret = platform::crypto::random_array::<32>();
        Self::new(Some(token_secret), cookie_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cookie_attributes() {
        let config = AuthConfig::with_random_secrets();
        assert_eq!(config.cookie.name, SESSION_COOKIE_NAME);
        assert!(config.cookie.http_only);
        assert!(config.cookie.secure);
        assert_eq!(config.cookie.same_site, SameSite::Strict);
        assert_eq!(config.cookie.max_age_secs, Some(SESSION_TTL_SECS));
        assert_eq!(config.token_ttl_secs, SESSION_TTL_SECS);
    }

    #[test]
    fn test_missing_token_secret_allowed() {
        let config = AuthConfig::new(None, [0u8; 32]);
        assert!(config.token_secret.is_none());
    }
}
