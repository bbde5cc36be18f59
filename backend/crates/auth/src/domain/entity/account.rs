//! Account Entity
//!
//! Credential-bearing side of a user: identifiers and the password hash.
//! Everything display-facing lives on [`Profile`](super::profile::Profile).

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, UserId, Username};

/// User account (credentials and identifiers)
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: UserId,
    pub username: Username,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh ID and current timestamps
    pub fn new(username: Username, email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash, bumping `updated_at`
    pub fn set_password_hash(&mut self, hash: HashedPassword) {
        self.password_hash = hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn account() -> Account {
        let password = ClearTextPassword::new("secret123".to_string()).unwrap();
        Account::new(
            Username::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            password.hash().unwrap(),
        )
    }

    #[test]
    fn test_new_account_has_fresh_id() {
        let a = account();
        let b = account();
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn test_set_password_hash_bumps_updated_at() {
        let mut a = account();
        let before = a.updated_at;
        let new_hash = ClearTextPassword::new("newsecret1".to_string())
            .unwrap()
            .hash()
            .unwrap();
        a.set_password_hash(new_hash);
        assert!(a.updated_at >= before);
    }
}
