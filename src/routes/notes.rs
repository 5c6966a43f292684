use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

use super::{resolve, AppState};
use crate::error::ApiError;
use crate::models::*;
use crate::sanitize::{sanitize_all, Sanitize};
use crate::validation::{into_body, Body, JsonBody, NoteInput, NoteUpdateInput};

pub const NOTE_NOT_FOUND: &str = "Note Not Found";

pub fn note_location(id: Id) -> String {
    format!("/api/notes/{id}")
}

/// The note addressed by an item route.
pub struct ResolvedNote(pub Note);

impl FromRequest for ResolvedNote {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let fut = resolve(req, NOTE_NOT_FOUND, |state, id| async move {
            state.repo.get_note(id).await
        });
        Box::pin(async move { fut.await.map(ResolvedNote) })
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "List notes", body = [Note]),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_token" = []))
)]
pub async fn list_notes(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let notes = data.repo.list_notes().await?;
    Ok(HttpResponse::Ok().json(sanitize_all(notes)))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteInput,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "A required field is missing; the message names it"),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_token" = []))
)]
pub async fn create_note(
    data: web::Data<AppState>,
    Body(payload): Body<NoteInput>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_new().inspect_err(|e| tracing::warn!("note rejected: {e}"))?;
    // an unknown folder_id surfaces as a store constraint error
    let note = data.repo.insert_note(new).await?;
    tracing::info!(id = note.id, folder_id = note.folder_id, "note created");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, note_location(note.id)))
        .json(note.sanitize()))
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Note not found")
    ),
    security(("api_token" = []))
)]
pub async fn get_note(ResolvedNote(note): ResolvedNote) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(note.sanitize()))
}

#[utoipa::path(
    patch,
    path = "/api/notes/{id}",
    request_body = NoteUpdateInput,
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note updated"),
        (status = 400, description = "Request body must contain either 'name' or 'content'"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Note not found")
    ),
    security(("api_token" = []))
)]
pub async fn update_note(
    data: web::Data<AppState>,
    ResolvedNote(note): ResolvedNote,
    payload: JsonBody<NoteUpdateInput>,
) -> Result<HttpResponse, ApiError> {
    let patch = into_body(payload)?.into_patch().inspect_err(|e| tracing::warn!(id = note.id, "note update rejected: {e}"))?;
    data.repo.update_note(note.id, patch).await?;
    tracing::info!(id = note.id, "note updated");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Note not found")
    ),
    security(("api_token" = []))
)]
pub async fn delete_note(
    data: web::Data<AppState>,
    ResolvedNote(note): ResolvedNote,
) -> Result<HttpResponse, ApiError> {
    data.repo.delete_note(note.id).await?;
    tracing::info!(id = note.id, "note deleted");
    Ok(HttpResponse::NoContent().finish())
}
