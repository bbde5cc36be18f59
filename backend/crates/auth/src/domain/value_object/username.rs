//! Username Value Object
//!
//! Public handle used for login alongside email. Case is preserved for
//! display; uniqueness checks go through the lowercase canonical form.
//!
//! ## Invariants
//! - 3 to 20 characters after NFKC normalization and trim
//! - ASCII letters, digits, `_`, `.`, `-` only
//! - Starts and ends with a letter, digit or `_`
//! - No consecutive dots

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use kernel::error::app_error::{AppError, AppResult};

/// Minimum username length (in characters)
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum username length (in characters)
pub const USERNAME_MAX_LENGTH: usize = 20;

/// Validated, normalized username
///
/// `original` preserves the user's casing for display; `canonical` is the
/// lowercase form stored with a unique index.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username {
    original: String,
    canonical: String,
}

impl Username {
    /// Create a new Username from raw input
    pub fn new(input: impl AsRef<str>) -> AppResult<Self> {
        let original: String = input.as_ref().nfkc().collect::<String>().trim().to_string();
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    fn validate(canonical: &str) -> AppResult<()> {
        if canonical.is_empty() {
            return Err(AppError::bad_request("Username cannot be empty"));
        }

        let length = canonical.chars().count();
        if length < USERNAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at least {USERNAME_MIN_LENGTH} characters"
            )));
        }
        if length > USERNAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {USERNAME_MAX_LENGTH} characters"
            )));
        }

        for ch in canonical.chars() {
            if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '.' | '-')) {
                return Err(AppError::bad_request(format!(
                    "Username contains invalid character '{ch}'"
                )));
            }
        }

        let first = canonical.chars().next().unwrap_or(' ');
        let last = canonical.chars().next_back().unwrap_or(' ');
        let edge_ok = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
        if !edge_ok(first) || !edge_ok(last) {
            return Err(AppError::bad_request(
                "Username must start and end with a letter, digit or underscore",
            ));
        }

        if canonical.contains("..") {
            return Err(AppError::bad_request(
                "Username cannot contain consecutive dots",
            ));
        }

        Ok(())
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    /// Original username (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical (lowercase) username, used for uniqueness
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Username")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for Username {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.original
    }
}
