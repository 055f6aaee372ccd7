/// Authentication module
///
/// Handles JWT token generation/validation, password hashing,
/// and refresh token management.

mod claims;
mod jwt;
mod password;
mod refresh_token;
mod session;

pub use claims::Claims;
pub use jwt::TokenIssuer;
pub use password::hash_password;
pub use password::validate_password;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::hash_token;
pub use session::SessionStore;
