//! Login Use Case
//!
//! Credential check against the stored hash. Every failure mode (unknown
//! identifier, wrong password, even a policy-invalid password string)
//! collapses into the same `InvalidCredentials` so responses never reveal
//! which accounts exist.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::{Account, Profile};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Login input: username or email, plus the password
#[derive(Debug)]
pub struct LoginInput {
    pub identifier: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<R> {
    repo: Arc<R>,
}

impl<R: AccountRepository> LoginUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<(Account, Profile)> {
        let identifier = input.identifier.trim().to_lowercase();
        if identifier.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        // A password that violates the policy could never have been
        // registered; report it the same as a wrong one.
        let password = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .repo
            .find_by_identifier(&identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self
            .repo
            .find_profile(account.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Account has no profile".to_string()))?;

        tracing::info!(user_id = %account.user_id, "Login succeeded");

        Ok((account, profile))
    }
}
