//! Person Name Value Object
//!
//! First/last name field on the profile. Length-checked, otherwise free
//! text (any script).

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use kernel::error::app_error::{AppError, AppResult};

/// Minimum name length (in characters)
pub const PERSON_NAME_MIN_LENGTH: usize = 3;

/// Maximum name length (in characters)
pub const PERSON_NAME_MAX_LENGTH: usize = 50;

/// Validated first or last name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name with validation
    pub fn new(input: impl AsRef<str>) -> AppResult<Self> {
        let name: String = input.as_ref().nfkc().collect::<String>().trim().to_string();

        let length = name.chars().count();
        if length < PERSON_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {PERSON_NAME_MIN_LENGTH} characters"
            )));
        }
        if length > PERSON_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {PERSON_NAME_MAX_LENGTH} characters"
            )));
        }
        if name.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PersonName {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<PersonName> for String {
    fn from(name: PersonName) -> Self {
        name.0
    }
}
