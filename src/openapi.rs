use crate::models::{Folder, Note};
use crate::validation::{FolderInput, FolderUpdateInput, NoteInput, NoteUpdateInput};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::folders::list_folders,
        crate::routes::folders::create_folder,
        crate::routes::folders::get_folder,
        crate::routes::folders::update_folder,
        crate::routes::folders::delete_folder,
        crate::routes::notes::list_notes,
        crate::routes::notes::create_note,
        crate::routes::notes::get_note,
        crate::routes::notes::update_note,
        crate::routes::notes::delete_note,
    ),
    components(schemas(
        Folder, Note, FolderInput, FolderUpdateInput, NoteInput, NoteUpdateInput
    )),
    modifiers(&BearerToken),
    tags(
        (name = "folders", description = "Folder operations"),
        (name = "notes", description = "Note operations"),
    )
)]
pub struct ApiDoc;

/// Declares the shared API token as an HTTP bearer scheme.
struct BearerToken;

impl Modify for BearerToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
