/// Refresh Token Generation
///
/// Refresh tokens are opaque: 32 random bytes from the OS, hex encoded. The
/// store only ever sees their SHA-256 digest.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// Returns `CryptoError::Entropy` if the OS random source fails
pub fn generate_refresh_token() -> Result<String, CryptoError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Hash a refresh token using SHA-256
///
/// Used as the storage key; plaintext tokens are never written to disk.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
