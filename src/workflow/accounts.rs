use serde::Serialize;

use crate::auth::{generate_refresh_token, hash_password, validate_password, verify_password};
use crate::db::{PublicUser, UserId};
use crate::error::{AppError, ErrorContext};
use crate::validators::is_valid_email;

use super::Workflow;

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    #[serde(flatten)]
    pub user: PublicUser,
    /// Access token
    pub token: String,
    pub refresh_token: String,
}

impl Workflow {
    /// Create a user. Emails are unique, compared exactly as stored.
    ///
    /// # Errors
    /// - 400: invalid email or password
    /// - 409: email already registered
    pub fn register(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        ErrorContext::new("register").run(|| {
            let email = is_valid_email(email)?;
            validate_password(password)?;
            let password_hash = hash_password(password, self.bcrypt_cost)?;

            let user = self.db.mutate(|snapshot| {
                snapshot
                    .insert_user(email, password_hash)
                    .ok_or_else(|| AppError::conflict(format!("email '{}' already registered", email)))
            })?;

            tracing::info!(user_id = user.id, "User registered");
            Ok(PublicUser::from(&user))
        })
    }

    /// Check credentials and open a session: one access token and one
    /// refresh token. Sessions opened earlier stay valid.
    ///
    /// # Errors
    /// - 404: no user with this email
    /// - 401: wrong password
    pub fn login(
        &self,
        email: &str,
        password: &str,
        expires_in_seconds: Option<i64>,
    ) -> Result<LoginSession, AppError> {
        ErrorContext::new("login").run(|| {
            let user = self
                .db
                .read(|snapshot| snapshot.find_user_by_email(email).cloned())?
                .ok_or_else(|| AppError::not_found(format!("user '{}'", email)))?;

            verify_password(password, &user.password_hash)?;

            let now = self.now();
            let token = self
                .tokens
                .issue_access_token_for(user.id, expires_in_seconds, now)?;
            let refresh_token = generate_refresh_token()?;
            self.sessions.create(user.id, &refresh_token, now)?;

            tracing::info!(user_id = user.id, "User logged in");
            Ok(LoginSession {
                user: PublicUser::from(&user),
                token,
                refresh_token,
            })
        })
    }

    /// Exchange an active refresh token for a new access token. The refresh
    /// token itself is not rotated.
    ///
    /// # Errors
    /// - 404: token never issued, or its user is gone
    /// - 401: token expired or revoked
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        ErrorContext::new("refresh").run(|| {
            let now = self.now();
            let user_id = self.sessions.validate(refresh_token, now)?;

            if !self.db.read(|snapshot| snapshot.users.contains_key(&user_id))? {
                return Err(AppError::not_found(format!("user {}", user_id)));
            }

            let token = self.tokens.issue_access_token(user_id, now)?;
            tracing::info!(user_id = user_id, "Access token refreshed");
            Ok(token)
        })
    }

    /// Revoke a refresh token. Revoking twice is fine.
    ///
    /// # Errors
    /// - 404: token never issued
    pub fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        ErrorContext::new("revoke").run(|| {
            let record = self.sessions.revoke(refresh_token, self.now())?;
            tracing::info!(user_id = record.user_id, "Refresh token revoked");
            Ok(())
        })
    }

    /// Replace the email and password of the user the access token was
    /// issued for.
    ///
    /// # Errors
    /// - 401: invalid access token
    /// - 400: invalid email or password
    /// - 404: user no longer exists
    /// - 409: email belongs to another user
    pub fn update_credentials(
        &self,
        access_token: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, AppError> {
        ErrorContext::new("update_credentials").run(|| {
            let user_id = self.authenticate(access_token)?;
            let email = is_valid_email(email)?;
            validate_password(password)?;
            let password_hash = hash_password(password, self.bcrypt_cost)?;

            let user = self.db.mutate(|snapshot| {
                if snapshot
                    .users
                    .values()
                    .any(|u| u.email == email && u.id != user_id)
                {
                    return Err(AppError::conflict(format!("email '{}' already registered", email)));
                }

                let user = snapshot
                    .users
                    .get_mut(&user_id)
                    .ok_or_else(|| AppError::not_found(format!("user {}", user_id)))?;
                user.email = email.to_string();
                user.password_hash = password_hash;
                Ok(PublicUser::from(&*user))
            })?;

            tracing::info!(user_id = user_id, "User credentials updated");
            Ok(user)
        })
    }

    /// Turn on the paid subscription flag.
    ///
    /// # Errors
    /// - 404: no such user
    pub fn upgrade_subscription(&self, user_id: UserId) -> Result<PublicUser, AppError> {
        ErrorContext::new("upgrade_subscription")
            .with_user_id(user_id)
            .run(|| {
                let user = self.db.mutate(|snapshot| {
                    let user = snapshot
                        .users
                        .get_mut(&user_id)
                        .ok_or_else(|| AppError::not_found(format!("user {}", user_id)))?;
                    user.is_chirpy_red = true;
                    Ok(PublicUser::from(&*user))
                })?;

                tracing::info!(user_id = user_id, "Subscription upgraded");
                Ok(user)
            })
    }
}
