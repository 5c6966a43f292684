use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Folder {
    pub id: Id,
    pub name: String,
}

/// Validated folder ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFolder {
    pub name: String,
}

/// Partial folder update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Note {
    pub id: Id,
    pub name: String,
    pub folder_id: Id,
    pub content: String,
    pub modified: DateTime<Utc>, // assigned by the store on insert
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub name: String,
    pub folder_id: Id,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub name: Option<String>,
    pub content: Option<String>,
}
