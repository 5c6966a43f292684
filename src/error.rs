use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::repo::RepoError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

/// Body of a 401: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Body of every other error: `{ "error": { "message": "..." } }`.
#[derive(Debug, Serialize)]
pub struct ApiErrorEnvelope {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ApiErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: ErrorMessage { message: message.into() } }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("unauthorized")] Unauthorized,
    #[error("{0}")] Validation(String),
    #[error("{0}")] NotFound(&'static str),
    #[error(transparent)] Store(#[from] RepoError),
    #[error("internal error: {0}")] Internal(&'static str),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        match self {
            ApiError::Unauthorized => res.json(ApiErrorBody { error: UNAUTHORIZED_MESSAGE.into() }),
            ApiError::Validation(msg) => res.json(ApiErrorEnvelope::new(msg.as_str())),
            ApiError::NotFound(msg) => res.json(ApiErrorEnvelope::new(*msg)),
            // detail is attached (or withheld) by the ErrorHandler middleware
            ApiError::Store(_) | ApiError::Internal(_) => res.json(ApiErrorEnvelope::new(crate::error_handler::GENERIC_MESSAGE)),
        }
    }
}
