/// JWT Claims structure
///
/// Payload of an access token: the standard registered claims this service
/// uses, decoded into a typed struct at parse time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::UserId;
use crate::error::AuthError;

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as decimal string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims for `user_id` issued at `now`, valid for `expiry_seconds`
    pub fn new(user_id: UserId, issuer: &str, now: DateTime<Utc>, expiry_seconds: i64) -> Self {
        let iat = now.timestamp();
        Self {
            sub: user_id.to_string(),
            exp: iat + expiry_seconds,
            iat,
            iss: issuer.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `AuthError::TokenInvalid` if the subject is not a user id
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenInvalid)
    }

    /// A token is expired from the `exp` second onward
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = Claims::new(42, "chirpy", now, 3600);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "chirpy");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired_at(now));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let claims = Claims::new(1, "chirpy", now, 60);

        assert!(!claims.is_expired_at(now + Duration::seconds(59)));
        assert!(claims.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(1, "chirpy", Utc::now(), 3600);
        claims.sub = "not-a-number".to_string();

        assert!(claims.user_id().is_err());
    }
}
