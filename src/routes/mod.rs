use std::future::Future;
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::error::ApiError;
use crate::models::Id;
use crate::repo::{Repo, RepoResult};
use crate::validation::json_config;

pub mod folders;
pub mod notes;

pub use folders::ResolvedFolder;
pub use notes::ResolvedNote;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/folders")
                        .route(web::get().to(folders::list_folders))
                        .route(web::post().to(folders::create_folder)),
                )
                .service(
                    web::resource("/folders/{id}")
                        .route(web::get().to(folders::get_folder))
                        .route(web::patch().to(folders::update_folder))
                        .route(web::delete().to(folders::delete_folder)),
                )
                .service(
                    web::resource("/notes")
                        .route(web::get().to(notes::list_notes))
                        .route(web::post().to(notes::create_note)),
                )
                .service(
                    web::resource("/notes/{id}")
                        .route(web::get().to(notes::get_note))
                        .route(web::patch().to(notes::update_note))
                        .route(web::delete().to(notes::delete_note)),
                ),
        );
}

#[derive(Clone)]
pub struct AppState { pub repo: Arc<dyn Repo> }

impl AppState {
    pub fn new(repo: Arc<dyn Repo>) -> Self { Self { repo } }
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Hello, world!")
}

/// The `{id}` segment of an item route, if it is a positive integer.
fn path_id(req: &HttpRequest) -> Option<Id> {
    req.match_info()
        .get("id")
        .and_then(|raw| raw.parse::<Id>().ok())
        .filter(|id| *id > 0)
}

/// Item resolution shared by every item route: look the id up and either
/// yield the entity or short-circuit with `NotFound`.
fn resolve<T, F, Fut>(req: &HttpRequest, not_found: &'static str, fetch: F) -> LocalBoxFuture<'static, Result<T, ApiError>>
where
    T: 'static,
    F: FnOnce(web::Data<AppState>, Id) -> Fut + 'static,
    Fut: Future<Output = RepoResult<Option<T>>> + 'static,
{
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let id = path_id(req);
    let raw = req.match_info().get("id").unwrap_or_default().to_owned();
    Box::pin(async move {
        let state = state.ok_or(ApiError::Internal("application state is not configured"))?;
        let Some(id) = id else {
            tracing::info!(id = %raw, "{not_found}: malformed id");
            return Err(ApiError::NotFound(not_found));
        };
        match fetch(state, id).await? {
            Some(entity) => Ok(entity),
            None => {
                tracing::info!(id, "{not_found}");
                Err(ApiError::NotFound(not_found))
            }
        }
    })
}
