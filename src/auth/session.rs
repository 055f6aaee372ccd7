/// Session Store
///
/// Refresh-token records live in the persistence engine, keyed by the token's
/// SHA-256 digest. States: ACTIVE until `expires_at` (then EXPIRED) or until
/// revoked (then REVOKED). Neither EXPIRED nor REVOKED is ever left.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::auth::refresh_token::hash_token;
use crate::db::{Database, RefreshTokenRecord, TokenState, UserId};
use crate::error::{AppError, AuthError};

#[derive(Clone)]
pub struct SessionStore {
    db: Arc<Database>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(db: Arc<Database>, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    /// Persist a fresh record for `token`, expiring `ttl` after `now`.
    ///
    /// Earlier tokens of the same user stay valid. Timestamps are cut to whole
    /// seconds, the precision of the store file, so a reloaded record matches
    /// the one held in memory.
    pub fn create(
        &self,
        user_id: UserId,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AppError> {
        let now = now.trunc_subsecs(0);
        let record = RefreshTokenRecord {
            user_id,
            issued_at: now,
            expires_at: now + self.ttl,
            revoked_at: None,
        };
        let key = hash_token(token);

        self.db.mutate(|snapshot| {
            snapshot.refresh_tokens.insert(key, record.clone());
            Ok(())
        })?;

        Ok(record)
    }

    pub fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        let key = hash_token(token);
        self.db.read(|snapshot| snapshot.refresh_tokens.get(&key).cloned())
    }

    /// Resolve an ACTIVE token to its owner.
    ///
    /// # Errors
    /// - `NotFound` if the token was never issued
    /// - `AuthError::TokenRevoked` / `AuthError::TokenExpired` otherwise
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AppError> {
        let record = self
            .lookup(token)?
            .ok_or_else(|| AppError::not_found("refresh token"))?;

        match record.state_at(now) {
            TokenState::Active => Ok(record.user_id),
            TokenState::Revoked => {
                tracing::warn!(user_id = record.user_id, "Attempt to use revoked refresh token");
                Err(AuthError::TokenRevoked.into())
            }
            TokenState::Expired => {
                tracing::info!(user_id = record.user_id, "Refresh token expired");
                Err(AuthError::TokenExpired.into())
            }
        }
    }

    /// Mark `token` revoked at `now`. Revoking an already revoked token keeps
    /// the original timestamp and succeeds.
    ///
    /// # Errors
    /// `NotFound` if the token was never issued
    pub fn revoke(&self, token: &str, now: DateTime<Utc>) -> Result<RefreshTokenRecord, AppError> {
        let key = hash_token(token);

        self.db.mutate(|snapshot| {
            let record = snapshot
                .refresh_tokens
                .get_mut(&key)
                .ok_or_else(|| AppError::not_found("refresh token"))?;
            if record.revoked_at.is_none() {
                record.revoked_at = Some(now.trunc_subsecs(0));
            }
            Ok(record.clone())
        })
    }
}
