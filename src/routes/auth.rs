/// Session Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::bearer_token;
use crate::state::AppState;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Shorter access token lifetime, capped at the configured maximum
    pub expires_in_seconds: Option<i64>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Returns the user together with an access token and a refresh token.
///
/// # Errors
/// - 404: no user with this email
/// - 401: wrong password
pub async fn login(
    form: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workflow = state.workflow.clone();
    let LoginRequest {
        email,
        password,
        expires_in_seconds,
    } = form.into_inner();

    let session =
        web::block(move || workflow.login(&email, &password, expires_in_seconds)).await??;

    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/refresh
///
/// Expects the refresh token as the bearer credential.
///
/// # Errors
/// - 401: missing, expired or revoked refresh token
/// - 404: unknown refresh token
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(&req)?;
    let workflow = state.workflow.clone();

    let token = web::block(move || workflow.refresh(&refresh_token)).await??;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
pub async fn revoke(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(&req)?;
    let workflow = state.workflow.clone();

    web::block(move || workflow.revoke(&refresh_token)).await??;

    Ok(HttpResponse::NoContent().finish())
}
