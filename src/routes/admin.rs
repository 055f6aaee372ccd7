use actix_web::{web, HttpResponse};

use crate::error::{AppError, AuthError};
use crate::state::AppState;

/// GET /admin/metrics
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let hits = state.hits.get();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
            hits
        ))
}

/// POST /admin/reset
///
/// Wipes every user, chirp and session and zeroes the hit counter. Only
/// available on the `dev` platform.
pub async fn reset(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if !state.settings.application.is_dev() {
        return Err(AuthError::Forbidden.into());
    }

    let workflow = state.workflow.clone();
    web::block(move || workflow.reset()).await??;
    state.hits.reset();

    tracing::info!("Store and hit counter reset");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and database reset to initial state."))
}
