use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::UserId;
use crate::error::{AppError, AuthError};
use crate::routes::api_key;
use crate::state::AppState;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: UserId,
}

/// POST /api/polka/webhooks
///
/// Payment provider callback. Only `user.upgraded` does anything; other
/// events are acknowledged and dropped.
///
/// # Errors
/// - 401: missing or wrong API key
/// - 404: unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    form: web::Json<WebhookRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let key = api_key(&req)?;
    let expected = &state.settings.polka.api_key;
    if expected.is_empty() || key != *expected {
        return Err(AuthError::InvalidApiKey.into());
    }

    let WebhookRequest { event, data } = form.into_inner();
    if event != USER_UPGRADED {
        tracing::debug!(event = %event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let workflow = state.workflow.clone();
    web::block(move || workflow.upgrade_subscription(data.user_id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
