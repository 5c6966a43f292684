use crate::models::{Folder, Note};

/// Entity-encodes the characters that can open markup or break out of an
/// attribute. Text without `<`, `>` or `"` comes back unchanged.
pub fn escape_markup(raw: &str) -> String {
    raw.replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Outbound escaping of free-text fields. Ids, foreign keys and timestamps pass through.
pub trait Sanitize {
    fn sanitize(self) -> Self;
}

impl Sanitize for Folder {
    fn sanitize(self) -> Self {
        Folder { name: escape_markup(&self.name), ..self }
    }
}

impl Sanitize for Note {
    fn sanitize(self) -> Self {
        Note {
            name: escape_markup(&self.name),
            content: escape_markup(&self.content),
            ..self
        }
    }
}

pub fn sanitize_all<T: Sanitize>(items: Vec<T>) -> Vec<T> {
    items.into_iter().map(Sanitize::sanitize).collect()
}
