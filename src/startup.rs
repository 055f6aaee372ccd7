use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::db::Database;
use crate::error::AppError;
use crate::logger::LoggerMiddleware;
use crate::routes::{
    create_chirp, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, register, reset, revoke, update_credentials,
};
use crate::state::{AppState, HitCounter};
use crate::workflow::Workflow;

/// Open the store and assemble the shared state.
///
/// With `application.debug` set, any existing store file is removed first.
pub fn build_state(settings: &Settings) -> Result<AppState, AppError> {
    let path = settings.database.path();

    if settings.application.debug {
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::warn!(path = %path.display(), "Debug mode: removed store file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    let db = Arc::new(Database::open(&path)?);
    let workflow = Workflow::new(settings, db);

    Ok(AppState {
        workflow: Arc::new(workflow),
        hits: HitCounter::default(),
        settings: settings.clone(),
    })
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let hits = state.hits.clone();
    let static_dir = state.settings.application.static_dir.clone();
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            // Request logging and /app hit counting
            .wrap(LoggerMiddleware::new(hits.clone(), "/app"))

            // Shared state
            .app_data(state.clone())

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(register))
                    .route("/users", web::put().to(update_credentials))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{id}", web::get().to(get_chirp))
                    .route("/chirps/{id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static file serving
            .service(fs::Files::new("/app", &static_dir).index_file("index.html"))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
