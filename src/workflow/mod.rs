/// Workflow
///
/// Composes the credential hasher, token issuer, session store and
/// persistence engine into the operations the request layer calls. Each
/// operation either commits fully or returns before touching the store.
///
/// Expensive work (bcrypt, signing, randomness) happens before the store's
/// exclusive lock is taken; checks that depend on current state happen inside
/// `Database::mutate`.

mod accounts;
mod chirps;

pub use accounts::LoginSession;
pub use chirps::SortOrder;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::auth::{SessionStore, TokenIssuer};
use crate::clock::{Clock, SystemClock};
use crate::configuration::{ChirpSettings, Settings};
use crate::db::{Database, UserId};
use crate::error::AppError;

pub struct Workflow {
    db: Arc<Database>,
    sessions: SessionStore,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    chirps: ChirpSettings,
    clock: Arc<dyn Clock>,
}

impl Workflow {
    pub fn new(settings: &Settings, db: Arc<Database>) -> Self {
        let sessions = SessionStore::new(
            Arc::clone(&db),
            Duration::seconds(settings.jwt.refresh_token_expiry),
        );

        Self {
            db,
            sessions,
            tokens: TokenIssuer::new(&settings.jwt),
            bcrypt_cost: settings.auth.bcrypt_cost,
            chirps: settings.chirps.clone(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Resolve an access token to the user it was issued for
    pub fn authenticate(&self, access_token: &str) -> Result<UserId, AppError> {
        self.tokens.validate_access_token(access_token, self.now())
    }

    /// Drop every user, chirp and session
    pub fn reset(&self) -> Result<(), AppError> {
        self.db.reset()
    }
}
