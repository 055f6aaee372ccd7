/// JWT Token Generation and Validation
///
/// Access tokens are HS256 JWTs signed with the process-wide secret. They are
/// never stored; validation is signature + algorithm + issuer + expiry.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::db::UserId;
use crate::error::{AppError, AuthError, CryptoError};

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry_seconds: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            expiry_seconds: config.access_token_expiry,
        }
    }

    /// Generate an access token for `user_id` with the fixed validity window
    ///
    /// # Errors
    /// Returns `CryptoError::Signing` if signing fails
    pub fn issue_access_token(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, AppError> {
        self.sign(&Claims::new(user_id, &self.issuer, now, self.expiry_seconds))
    }

    /// Generate an access token with a caller-requested lifetime, clamped to
    /// the fixed window. `None`, zero, negative or oversized requests get the
    /// full window.
    pub fn issue_access_token_for(
        &self,
        user_id: UserId,
        requested_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let seconds = match requested_seconds {
            Some(s) if s > 0 && s < self.expiry_seconds => s,
            _ => self.expiry_seconds,
        };
        self.sign(&Claims::new(user_id, &self.issuer, now, seconds))
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CryptoError::Signing(e.to_string()).into())
    }

    /// Decode and check a token, returning its claims
    ///
    /// Expired, malformed, tampered, wrong-issuer and wrong-algorithm tokens
    /// all fail with `AuthError::TokenInvalid`.
    pub fn decode_access_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // expiry is checked below against the caller's clock, with no leeway
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT validation error: {}", e);
                AuthError::TokenInvalid
            })?;

        if claims.is_expired_at(now) {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "JWT expired");
            return Err(AuthError::TokenInvalid.into());
        }

        Ok(claims)
    }

    /// Validate an access token and extract the user id from its subject
    pub fn validate_access_token(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AppError> {
        let claims = self.decode_access_token(token, now)?;
        Ok(claims.user_id()?)
    }
}
