use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::{ChirpId, UserId};
use crate::error::AppError;
use crate::routes::bearer_token;
use crate::state::AppState;
use crate::workflow::SortOrder;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub author_id: Option<UserId>,
    pub sort: Option<String>,
}

/// POST /api/chirps
pub async fn create_chirp(
    req: HttpRequest,
    form: web::Json<ChirpRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let workflow = state.workflow.clone();
    let body = form.into_inner().body;

    let chirp = web::block(move || workflow.create_chirp(&token, &body)).await??;

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps?author_id=&sort=
pub async fn list_chirps(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order = SortOrder::parse(query.sort.as_deref())?;
    let author_id = query.author_id;
    let workflow = state.workflow.clone();

    // waits on the store lock, which a writer holds across its fsync
    let chirps = web::block(move || workflow.list_chirps(author_id, order)).await??;

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{id}
pub async fn get_chirp(
    path: web::Path<ChirpId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workflow = state.workflow.clone();
    let id = path.into_inner();

    let chirp = web::block(move || workflow.get_chirp(id)).await??;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{id}
///
/// # Errors
/// - 401: missing or invalid access token
/// - 404: no such chirp
/// - 403: caller is not the author
pub async fn delete_chirp(
    req: HttpRequest,
    path: web::Path<ChirpId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let workflow = state.workflow.clone();
    let id = path.into_inner();

    web::block(move || workflow.delete_chirp(&token, id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
