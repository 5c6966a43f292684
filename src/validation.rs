//! Typed request bodies and the checks that turn them into store inputs.
//! Every check runs before the store is touched.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{FolderPatch, Id, NewFolder, NewNote, NotePatch};

pub const FOLDER_NAME_REQUIRED: &str = "'name' is required";
pub const FOLDER_UPDATE_REQUIRED: &str = "Request body must contain 'name'";
pub const NOTE_UPDATE_REQUIRED: &str = "Request body must contain either 'name' or 'content'";

/// JSON request body. A request that carries no body at all reads as `{}`,
/// so the field checks below report what is missing.
pub struct Body<T>(pub T);

fn declares_no_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return false;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .map_or(true, |len| len.to_str().is_ok_and(|v| v.trim() == "0"))
}

impl<T> FromRequest for Body<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if declares_no_body(req) {
            return Box::pin(ready(Ok(Body(T::default()))));
        }
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move { json.await.map(|body| Body(body.into_inner())) })
    }
}

/// A body whose extraction failure is handled by the handler, after
/// item resolution has run.
pub type JsonBody<T> = Result<Body<T>, actix_web::Error>;

pub fn into_body<T>(payload: JsonBody<T>) -> Result<T, ApiError> {
    payload
        .map(|Body(body)| body)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

/// Shared `JsonConfig`: malformed bodies become `400 { error: { message } }`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        tracing::warn!(path = %req.path(), error = %err, "rejected request body");
        ApiError::Validation(format!("Invalid request body: {err}")).into()
    })
}

fn missing(field: &str) -> ApiError {
    ApiError::Validation(format!("Missing '{field}' in request body"))
}

// Absent, null, empty and whitespace-only all count as "not given".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FolderInput {
    pub name: Option<String>,
}

impl FolderInput {
    pub fn into_new(self) -> Result<NewFolder, ApiError> {
        let name = non_blank(self.name).ok_or_else(|| ApiError::Validation(FOLDER_NAME_REQUIRED.into()))?;
        Ok(NewFolder { name })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FolderUpdateInput {
    pub name: Option<String>,
}

impl FolderUpdateInput {
    pub fn into_patch(self) -> Result<FolderPatch, ApiError> {
        let name = non_blank(self.name).ok_or_else(|| ApiError::Validation(FOLDER_UPDATE_REQUIRED.into()))?;
        Ok(FolderPatch { name: Some(name) })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NoteInput {
    pub name: Option<String>,
    pub folder_id: Option<Id>,
    /// May be empty, but must be present.
    pub content: Option<String>,
}

impl NoteInput {
    pub fn into_new(self) -> Result<NewNote, ApiError> {
        let name = non_blank(self.name).ok_or_else(|| missing("name"))?;
        let folder_id = self.folder_id.ok_or_else(|| missing("folder_id"))?;
        let content = self.content.ok_or_else(|| missing("content"))?;
        Ok(NewNote { name, folder_id, content })
    }
}

/// Only `name` and `content` are writable; anything else in the body is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NoteUpdateInput {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdateInput {
    pub fn into_patch(self) -> Result<NotePatch, ApiError> {
        let name = non_blank(self.name);
        let has_content = self.content.as_deref().is_some_and(|c| !c.is_empty());
        if name.is_none() && !has_content {
            return Err(ApiError::Validation(NOTE_UPDATE_REQUIRED.into()));
        }
        Ok(NotePatch { name, content: self.content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn folder_name_must_be_non_blank() {
        for name in [None, Some(""), Some("   ")] {
            let input = FolderInput { name: name.map(String::from) };
            assert_eq!(message(input.into_new().unwrap_err()), FOLDER_NAME_REQUIRED);
        }
        let new = FolderInput { name: Some("Work".into()) }.into_new().unwrap();
        assert_eq!(new.name, "Work");
    }

    #[test]
    fn note_reports_first_missing_field() {
        let input = NoteInput { name: None, folder_id: None, content: None };
        assert_eq!(message(input.into_new().unwrap_err()), "Missing 'name' in request body");

        let input = NoteInput { name: Some("n".into()), folder_id: None, content: Some("c".into()) };
        assert_eq!(message(input.into_new().unwrap_err()), "Missing 'folder_id' in request body");

        let input = NoteInput { name: Some("n".into()), folder_id: Some(1), content: None };
        assert_eq!(message(input.into_new().unwrap_err()), "Missing 'content' in request body");
    }

    #[test]
    fn note_content_may_be_empty() {
        let input = NoteInput { name: Some("n".into()), folder_id: Some(1), content: Some(String::new()) };
        let new = input.into_new().unwrap();
        assert_eq!(new.content, "");
    }

    #[test]
    fn folder_update_requires_name() {
        let err = FolderUpdateInput { name: Some(String::new()) }.into_patch().unwrap_err();
        assert_eq!(message(err), FOLDER_UPDATE_REQUIRED);
        let patch = FolderUpdateInput { name: Some("x".into()) }.into_patch().unwrap();
        assert_eq!(patch.name.as_deref(), Some("x"));
    }

    #[test]
    fn note_update_needs_one_meaningful_field() {
        let err = NoteUpdateInput::default().into_patch().unwrap_err();
        assert_eq!(message(err), NOTE_UPDATE_REQUIRED);

        let err = NoteUpdateInput { name: Some(" ".into()), content: Some(String::new()) }
            .into_patch()
            .unwrap_err();
        assert_eq!(message(err), NOTE_UPDATE_REQUIRED);

        let patch = NoteUpdateInput { name: None, content: Some("body".into()) }.into_patch().unwrap();
        assert_eq!(patch, NotePatch { name: None, content: Some("body".into()) });

        let patch = NoteUpdateInput { name: Some("title".into()), content: None }.into_patch().unwrap();
        assert_eq!(patch, NotePatch { name: Some("title".into()), content: None });
    }
}
