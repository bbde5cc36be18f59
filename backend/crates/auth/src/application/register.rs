//! Registration Use Case
//!
//! Validates input, checks identifier uniqueness, hashes the password and
//! persists account plus profile in one transaction. The caller decides
//! whether to issue a session afterwards.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::{Account, Profile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, PersonName, Role, Username};
use crate::error::{AuthError, AuthResult};

/// Registration input
#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to [`Role::User`] when absent
    pub role: Option<Role>,
}

/// Registration use case
pub struct RegisterUseCase<R> {
    repo: Arc<R>,
}

impl<R: AccountRepository> RegisterUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<(Account, Profile)> {
        let username = Username::new(&input.username)?;
        let email = Email::new(input.email)?;
        let first_name = PersonName::new(&input.first_name)?;
        let last_name = PersonName::new(&input.last_name)?;
        let role = input.role.unwrap_or_default();

        if self.repo.exists_by_email(email.as_str()).await? {
            return Err(AuthError::EmailInUse);
        }
        if self.repo.exists_by_username(username.canonical()).await? {
            return Err(AuthError::UsernameInUse);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash()?;

        let account = Account::new(username, email, password_hash);
        let profile = Profile::new(account.user_id, first_name, last_name, role);

        self.repo.create(&account, &profile).await?;

        tracing::info!(
            user_id = %account.user_id,
            role = %profile.role,
            "Account registered"
        );

        Ok((account, profile))
    }
}
