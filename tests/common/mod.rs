#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use noteful::models::*;
use noteful::repo::inmem::InMemRepo;
use noteful::repo::{FolderRepo, NoteRepo, Repo, RepoError, RepoResult};
use noteful::{config, AppState, AuthGate, ErrorHandler, SecurityHeaders};
use std::sync::Arc;

pub const TOKEN: &str = "test-api-token";

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TOKEN}"))
}

/// The production middleware stack around `config`, minus CORS and tracing.
pub async fn init_app(
    repo: Arc<dyn Repo>,
    errors: ErrorHandler,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(errors)
            .wrap(AuthGate::new(TOKEN))
            .wrap(SecurityHeaders::new())
            .app_data(web::Data::new(AppState::new(repo)))
            .configure(config),
    )
    .await
}

pub async fn verbose_app(
    repo: Arc<dyn Repo>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    init_app(repo, ErrorHandler::new(true)).await
}

pub async fn seeded_repo() -> InMemRepo {
    let repo = InMemRepo::new();
    for name in ["Important", "Super", "Spangley"] {
        repo.insert_folder(NewFolder { name: name.into() }).await.unwrap();
    }
    repo
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}

/// Store whose every call fails, for exercising the error path.
pub struct FailingRepo;

fn boom<T>() -> RepoResult<T> {
    Err(RepoError::Internal("connection refused".into()))
}

#[async_trait]
impl FolderRepo for FailingRepo {
    async fn list_folders(&self) -> RepoResult<Vec<Folder>> { boom() }
    async fn get_folder(&self, _id: Id) -> RepoResult<Option<Folder>> { boom() }
    async fn insert_folder(&self, _new: NewFolder) -> RepoResult<Folder> { boom() }
    async fn update_folder(&self, _id: Id, _patch: FolderPatch) -> RepoResult<u64> { boom() }
    async fn delete_folder(&self, _id: Id) -> RepoResult<u64> { boom() }
}

#[async_trait]
impl NoteRepo for FailingRepo {
    async fn list_notes(&self) -> RepoResult<Vec<Note>> { boom() }
    async fn get_note(&self, _id: Id) -> RepoResult<Option<Note>> { boom() }
    async fn insert_note(&self, _new: NewNote) -> RepoResult<Note> { boom() }
    async fn update_note(&self, _id: Id, _patch: NotePatch) -> RepoResult<u64> { boom() }
    async fn delete_note(&self, _id: Id) -> RepoResult<u64> { boom() }
}
