/// Password Hashing and Verification
///
/// Handles password hashing with bcrypt and basic input checks.

use bcrypt::{hash, verify};

use crate::error::{AppError, AuthError, CryptoError, ValidationError};

/// bcrypt only looks at the first 72 bytes of its input
const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt
///
/// # Arguments
/// * `password` - Plain text password to hash
/// * `cost` - bcrypt work factor
///
/// # Errors
/// Returns `CryptoError::Hashing` if bcrypt fails
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| CryptoError::Hashing(e.to_string()).into())
}

/// Verify a password against its hash
///
/// # Errors
/// - `AuthError::InvalidCredentials` if the password does not match
/// - `CryptoError::Hashing` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials.into()),
        Err(e) => Err(CryptoError::Hashing(e.to_string()).into()),
    }
}

/// Reject passwords bcrypt cannot represent faithfully
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        ));
    }

    Ok(())
}
