/// User Routes
///
/// Account creation and credential changes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::bearer_token;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or password
/// - 409: email already registered
pub async fn register(
    form: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workflow = state.workflow.clone();
    let CredentialsRequest { email, password } = form.into_inner();

    let user = web::block(move || workflow.register(&email, &password)).await??;

    Ok(HttpResponse::Created().json(user))
}

/// PUT /api/users
///
/// Replaces the caller's email and password.
///
/// # Errors
/// - 401: missing or invalid access token
/// - 400: invalid email or password
/// - 409: email belongs to another user
pub async fn update_credentials(
    req: HttpRequest,
    form: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let workflow = state.workflow.clone();
    let CredentialsRequest { email, password } = form.into_inner();

    let user = web::block(move || workflow.update_credentials(&token, &email, &password))
        .await??;

    Ok(HttpResponse::Ok().json(user))
}
