mod admin;
mod auth;
mod chirps;
mod health_check;
mod users;
mod webhooks;

pub use admin::{metrics, reset};
pub use auth::{login, refresh, revoke};
pub use chirps::{create_chirp, delete_chirp, get_chirp, list_chirps};
pub use health_check::health_check;
pub use users::{register, update_credentials};
pub use webhooks::polka_webhook;

use actix_web::{http::header, HttpRequest};

use crate::error::{AppError, AuthError};

/// Value of `Authorization: <scheme> <value>`, if the header uses `scheme`
fn authorization(req: &HttpRequest, scheme: &str) -> Result<String, AppError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(scheme))
        .and_then(|h| h.strip_prefix(' '))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::MissingToken.into())
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    authorization(req, "Bearer")
}

/// Key from `Authorization: ApiKey <key>`
pub fn api_key(req: &HttpRequest) -> Result<String, AppError> {
    authorization(req, "ApiKey").map_err(|_| AuthError::InvalidApiKey.into())
}
