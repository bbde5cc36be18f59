//! Account Repository Trait
//!
//! Persistence boundary for accounts and profiles. The Postgres
//! implementation lives in `infra::postgres`; tests substitute an
//! in-memory implementation.

use crate::domain::entity::{Account, Profile};
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Repository interface for account persistence
///
/// `find_by_identifier` accepts either a canonical username or a
/// lowercased email; login does not distinguish the two.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Persist a new account with its profile, atomically
    async fn create(&self, account: &Account, profile: &Profile) -> AuthResult<()>;

    /// Find an account by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<Account>>;

    /// Find an account by username or email
    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<Account>>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, email: &str) -> AuthResult<bool>;

    /// Check whether a canonical username is already taken
    async fn exists_by_username(&self, canonical: &str) -> AuthResult<bool>;

    /// Fetch the profile for an account
    async fn find_profile(&self, user_id: UserId) -> AuthResult<Option<Profile>>;

    /// Update account identifiers (username, email)
    async fn update_account(&self, account: &Account) -> AuthResult<()>;

    /// Update profile fields (names)
    async fn update_profile(&self, profile: &Profile) -> AuthResult<()>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, account: &Account) -> AuthResult<()>;

    /// Delete an account and its profile
    async fn delete(&self, user_id: UserId) -> AuthResult<()>;

    /// List all accounts with their profiles (admin surface)
    async fn list_accounts(&self) -> AuthResult<Vec<(Account, Profile)>>;
}
