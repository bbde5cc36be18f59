//! Account Management Use Cases
//!
//! Operations on the caller's own account (profile read/update, password
//! change, deletion) plus the admin-only account listing.
//!
//! Password change verifies the current password and stores a fresh hash
//! of the new one; plaintext never reaches the repository.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::{Account, Profile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, PersonName, UserId, Username};
use crate::error::{AuthError, AuthResult};

/// Profile update input; absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Account management use cases
pub struct AccountUseCase<R> {
    repo: Arc<R>,
}

impl<R: AccountRepository> AccountUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Fetch the caller's account and profile
    pub async fn get(&self, user_id: UserId) -> AuthResult<(Account, Profile)> {
        let account = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        let profile = self
            .repo
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Account has no profile".to_string()))?;
        Ok((account, profile))
    }

    /// Apply a partial profile update
    pub async fn update(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
    ) -> AuthResult<(Account, Profile)> {
        let (mut account, mut profile) = self.get(user_id).await?;

        if let Some(raw) = input.username {
            let username = Username::new(&raw)?;
            if username.canonical() != account.username.canonical()
                && self.repo.exists_by_username(username.canonical()).await?
            {
                return Err(AuthError::UsernameInUse);
            }
            account.username = username;
        }

        if let Some(raw) = input.email {
            let email = Email::new(raw)?;
            if email != account.email && self.repo.exists_by_email(email.as_str()).await? {
                return Err(AuthError::EmailInUse);
            }
            account.email = email;
        }

        if let Some(raw) = input.first_name {
            profile.first_name = PersonName::new(&raw)?;
        }
        if let Some(raw) = input.last_name {
            profile.last_name = PersonName::new(&raw)?;
        }

        account.updated_at = chrono::Utc::now();
        self.repo.update_account(&account).await?;
        self.repo.update_profile(&profile).await?;

        tracing::info!(user_id = %user_id, "Profile updated");

        Ok((account, profile))
    }

    /// Change the password, verifying the current one first
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let mut account = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let current = ClearTextPassword::new(current_password)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !account.password_hash.verify(&current) {
            return Err(AuthError::InvalidCredentials);
        }

        let new = ClearTextPassword::new(new_password)?;
        account.set_password_hash(new.hash()?);
        self.repo.update_password_hash(&account).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }

    /// Delete the caller's account (profile goes with it)
    pub async fn delete(&self, user_id: UserId) -> AuthResult<()> {
        // Report 404 rather than silently succeeding on a stale session
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        self.repo.delete(user_id).await?;

        tracing::info!(user_id = %user_id, "Account deleted");

        Ok(())
    }

    /// List every account with its profile (admin surface)
    pub async fn list(&self) -> AuthResult<Vec<(Account, Profile)>> {
        self.repo.list_accounts().await
    }
}
