use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

use super::{resolve, AppState};
use crate::error::ApiError;
use crate::models::*;
use crate::sanitize::{sanitize_all, Sanitize};
use crate::validation::{into_body, Body, FolderInput, FolderUpdateInput, JsonBody};

pub const FOLDER_NOT_FOUND: &str = "Folder Not Found";

pub fn folder_location(id: Id) -> String {
    format!("/api/folders/{id}")
}

/// The folder addressed by an item route, looked up before the verb handler runs.
pub struct ResolvedFolder(pub Folder);

impl FromRequest for ResolvedFolder {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let fut = resolve(req, FOLDER_NOT_FOUND, |state, id| async move {
            state.repo.get_folder(id).await
        });
        Box::pin(async move { fut.await.map(ResolvedFolder) })
    }
}

#[utoipa::path(
    get,
    path = "/api/folders",
    responses(
        (status = 200, description = "List folders", body = [Folder]),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_token" = []))
)]
pub async fn list_folders(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let folders = data.repo.list_folders().await?;
    Ok(HttpResponse::Ok().json(sanitize_all(folders)))
}

#[utoipa::path(
    post,
    path = "/api/folders",
    request_body = FolderInput,
    responses(
        (status = 201, description = "Folder created", body = Folder),
        (status = 400, description = "'name' is required"),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_token" = []))
)]
pub async fn create_folder(
    data: web::Data<AppState>,
    Body(payload): Body<FolderInput>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_new().inspect_err(|e| tracing::warn!("folder rejected: {e}"))?;
    let folder = data.repo.insert_folder(new).await?;
    tracing::info!(id = folder.id, "folder created");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, folder_location(folder.id)))
        .json(folder.sanitize()))
}

#[utoipa::path(
    get,
    path = "/api/folders/{id}",
    params(("id" = i64, Path, description = "Folder id")),
    responses(
        (status = 200, description = "Folder", body = Folder),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found")
    ),
    security(("api_token" = []))
)]
pub async fn get_folder(ResolvedFolder(folder): ResolvedFolder) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(folder.sanitize()))
}

#[utoipa::path(
    patch,
    path = "/api/folders/{id}",
    request_body = FolderUpdateInput,
    params(("id" = i64, Path, description = "Folder id")),
    responses(
        (status = 204, description = "Folder updated"),
        (status = 400, description = "Request body must contain 'name'"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found")
    ),
    security(("api_token" = []))
)]
pub async fn update_folder(
    data: web::Data<AppState>,
    ResolvedFolder(folder): ResolvedFolder,
    payload: JsonBody<FolderUpdateInput>,
) -> Result<HttpResponse, ApiError> {
    let patch = into_body(payload)?.into_patch().inspect_err(|e| tracing::warn!(id = folder.id, "folder update rejected: {e}"))?;
    data.repo.update_folder(folder.id, patch).await?;
    tracing::info!(id = folder.id, "folder updated");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    delete,
    path = "/api/folders/{id}",
    params(("id" = i64, Path, description = "Folder id")),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found")
    ),
    security(("api_token" = []))
)]
pub async fn delete_folder(
    data: web::Data<AppState>,
    ResolvedFolder(folder): ResolvedFolder,
) -> Result<HttpResponse, ApiError> {
    data.repo.delete_folder(folder.id).await?;
    tracing::info!(id = folder.id, "folder deleted");
    Ok(HttpResponse::NoContent().finish())
}
