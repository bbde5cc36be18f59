//! Account Role
//!
//! Three-level role ladder. Stored as a smallint, serialized as the
//! uppercase wire names clients send and receive.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Seller,
    Admin,
}

impl Role {
    /// Wire name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Seller => "SELLER",
            Role::Admin => "ADMIN",
        }
    }

    /// Storage code for the database smallint column
    pub fn as_code(&self) -> i16 {
        match self {
            Role::User => 0,
            Role::Seller => 1,
            Role::Admin => 2,
        }
    }

    /// Decode a storage code
    pub fn from_code(code: i16) -> Result<Self, AuthError> {
        match code {
            0 => Ok(Role::User),
            1 => Ok(Role::Seller),
            2 => Ok(Role::Admin),
            _ => Err(AuthError::Internal(format!("Unknown role code: {code}"))),
        }
    }

    /// Parse the wire name (case-insensitive)
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "SELLER" => Ok(Role::Seller),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(AuthError::Validation(format!("Unknown role: {s}"))),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_seller(&self) -> bool {
        matches!(self, Role::Seller)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_code_roundtrip() {
        for role in [Role::User, Role::Seller, Role::Admin] {
            assert_eq!(Role::from_code(role.as_code()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(Role::from_code(7).is_err());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("SELLER").unwrap(), Role::Seller);
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"SELLER\"").unwrap();
        assert_eq!(role, Role::Seller);
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::User < Role::Seller);
        assert!(Role::Seller < Role::Admin);
    }
}
