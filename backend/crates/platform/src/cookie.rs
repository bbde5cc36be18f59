//! Cookie Management Infrastructure
//!
//! Cookie attribute handling plus a tamper-evident signed envelope.
//!
//! The envelope format is `<value>.<base64url(HMAC-SHA256(secret, value))>`.
//! The value itself may contain dots, so the signature is always split off
//! at the *last* dot. The envelope secret is independent of whatever
//! secret protects the enclosed value; the envelope check runs first and
//! a failed check rejects the cookie before the value is ever parsed.

use axum::http::{HeaderMap, HeaderValue, header};
use thiserror::Error;

use crate::crypto::{constant_time_eq, from_base64_url, hmac_sha256, to_base64_url};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Signed envelope verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignedCookieError {
    /// No signature segment present
    #[error("Cookie value carries no signature")]
    MissingSignature,

    /// Signature did not verify (tampered value or wrong secret)
    #[error("Cookie signature verification failed")]
    InvalidSignature,
}

/// Cookie configuration
///
/// The same config instance must be used for both setting and clearing:
/// browsers only remove a cookie when the clearing attributes match the
/// ones it was set with.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub domain: Option<String>,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            domain: None,
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
        if let Some(domain) = &self.domain {
            cookie.push_str(&format!("; Domain={}", domain));
        }
        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion
    ///
    /// Carries the full attribute set of [`build_set_cookie`] with
    /// Max-Age=0 and an epoch Expires, so the browser actually drops it.
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
        if let Some(domain) = &self.domain {
            cookie.push_str(&format!("; Domain={}", domain));
        }
        cookie.push_str("; Max-Age=0");
        cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");

        cookie
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> HeaderValue {
    HeaderValue::from_str(&config.build_set_cookie(value))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Create a clearing Set-Cookie header value
pub fn delete_cookie_header(config: &CookieConfig) -> HeaderValue {
    HeaderValue::from_str(&config.build_delete_cookie())
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Wrap a value in the signed envelope
pub fn sign_value(value: &str, secret: &[u8; 32]) -> String {
    let mac = hmac_sha256(secret, value.as_bytes());
    format!("{}.{}", value, to_base64_url(&mac))
}

/// Unwrap a signed envelope, returning the inner value
///
/// Rejects before the inner value is interpreted in any way.
pub fn verify_value(sealed: &str, secret: &[u8; 32]) -> Result<String, SignedCookieError> {
    let (value, signature_b64) = sealed
        .rsplit_once('.')
        .ok_or(SignedCookieError::MissingSignature)?;

    let signature =
        from_base64_url(signature_b64).map_err(|_| SignedCookieError::InvalidSignature)?;

    let expected = hmac_sha256(secret, value.as_bytes());

    if !constant_time_eq(&expected, &signature) {
        return Err(SignedCookieError::InvalidSignature);
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CookieConfig {
        CookieConfig {
            name: "x-auth-token".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            domain: Some("example.com".to_string()),
            max_age_secs: Some(3600),
        }
    }

    #[test]
    fn test_cookie_config_build() {
        let cookie = config().build_set_cookie("value123");
        assert!(cookie.starts_with("x-auth-token=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Domain=example.com"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_delete_cookie_attribute_parity() {
        let config = config();
        let set = config.build_set_cookie("v");
        let delete = config.build_delete_cookie();

        // Every attribute of the set cookie (except Max-Age) must appear
        // on the delete cookie, or browsers keep the original alive.
        for attr in ["HttpOnly", "Secure", "SameSite=Strict", "Path=/", "Domain=example.com"] {
            assert!(set.contains(attr));
            assert!(delete.contains(attr), "delete cookie missing {attr}");
        }
        assert!(delete.contains("Max-Age=0"));
        assert!(delete.contains("Expires=Thu, 01 Jan 1970"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; x-auth-token=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "x-auth-token"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let secret = [7u8; 32];
        let sealed = sign_value("header.payload.sig", &secret);
        let opened = verify_value(&sealed, &secret).unwrap();
        assert_eq!(opened, "header.payload.sig");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let sealed = sign_value("some-token", &[7u8; 32]);
        let result = verify_value(&sealed, &[8u8; 32]);
        assert_eq!(result, Err(SignedCookieError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_tampered_value() {
        let secret = [7u8; 32];
        let sealed = sign_value("some-token", &secret);
        let tampered = sealed.replacen("some", "evil", 1);
        let result = verify_value(&tampered, &secret);
        assert_eq!(result, Err(SignedCookieError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_unsigned_value() {
        let result = verify_value("no-signature-here", &[7u8; 32]);
        assert_eq!(result, Err(SignedCookieError::MissingSignature));
    }

    #[test]
    fn test_verify_rejects_garbage_signature() {
        let result = verify_value("value.###not-base64###", &[7u8; 32]);
        assert_eq!(result, Err(SignedCookieError::InvalidSignature));
    }
}
