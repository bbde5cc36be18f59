//! Profile Entity
//!
//! Display-facing side of a user: name and role. Shares the account's ID
//! (one profile per account).

use crate::domain::value_object::{PersonName, Role, UserId};

/// User profile (display data and role)
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: Role,
}

impl Profile {
    pub fn new(user_id: UserId, first_name: PersonName, last_name: PersonName, role: Role) -> Self {
        Self {
            user_id,
            first_name,
            last_name,
            role,
        }
    }
}
