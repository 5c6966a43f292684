use async_trait::async_trait;

use crate::models::*;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("constraint violation: {0}")] Constraint(String),
    #[error("store failure: {0}")] Internal(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        // SQLSTATE class 23 = integrity constraint violation
        let is_constraint = e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.starts_with("23"))
            .unwrap_or(false);
        if is_constraint {
            RepoError::Constraint(e.to_string())
        } else {
            RepoError::Internal(e.to_string())
        }
    }
}

/// CRUD contract for folders. Absence is `Ok(None)` / a zero count, never an error.
#[async_trait]
pub trait FolderRepo: Send + Sync {
    async fn list_folders(&self) -> RepoResult<Vec<Folder>>;
    async fn get_folder(&self, id: Id) -> RepoResult<Option<Folder>>;
    async fn insert_folder(&self, new: NewFolder) -> RepoResult<Folder>;
    async fn update_folder(&self, id: Id, patch: FolderPatch) -> RepoResult<u64>;
    async fn delete_folder(&self, id: Id) -> RepoResult<u64>;
}

#[async_trait]
pub trait NoteRepo: Send + Sync {
    async fn list_notes(&self) -> RepoResult<Vec<Note>>;
    async fn get_note(&self, id: Id) -> RepoResult<Option<Note>>;
    async fn insert_note(&self, new: NewNote) -> RepoResult<Note>;
    async fn update_note(&self, id: Id, patch: NotePatch) -> RepoResult<u64>;
    async fn delete_note(&self, id: Id) -> RepoResult<u64>;
}

pub trait Repo: FolderRepo + NoteRepo {}

impl<T> Repo for T where T: FolderRepo + NoteRepo {}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use chrono::Utc;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tracing::{info, warn};

    #[derive(Clone, Default, Serialize, Deserialize)]
    struct State {
        folders: BTreeMap<Id, Folder>,
        notes: BTreeMap<Id, Note>,
        last_folder_id: Id,
        last_note_id: Id,
    }

    /// Ordered in-memory store. Ids are handed out sequentially per resource,
    /// so iteration order equals insertion order.
    #[derive(Clone, Default)]
    pub struct InMemRepo {
        state: Arc<RwLock<State>>,
        snapshot_path: Option<Arc<PathBuf>>,
    }

    impl InMemRepo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store backed by a JSON snapshot at `path`: loaded now, rewritten after every write.
        pub async fn with_snapshot(path: impl Into<PathBuf>) -> RepoResult<Self> {
            let path = path.into();
            let state = Self::load_state_from(&path).await?;
            Ok(Self {
                state: Arc::new(RwLock::new(state)),
                snapshot_path: Some(Arc::new(path)),
            })
        }

        async fn load_state_from(path: &Path) -> RepoResult<State> {
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let state: State = serde_json::from_slice(&bytes).map_err(|e| {
                        RepoError::Internal(format!("unreadable snapshot '{}': {e}", path.display()))
                    })?;
                    info!(path = %path.display(), folders = state.folders.len(), notes = state.notes.len(), "loaded snapshot");
                    Ok(state)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "no snapshot yet, starting empty");
                    Ok(State::default())
                }
                Err(e) => Err(RepoError::Internal(format!("cannot read snapshot '{}': {e}", path.display()))),
            }
        }

        // Called with the write lock held so snapshots land in commit order.
        async fn persist(&self, state: &State) -> RepoResult<()> {
            let Some(path) = self.snapshot_path.as_deref() else { return Ok(()) };
            let bytes = serde_json::to_vec_pretty(state)
                .map_err(|e| RepoError::Internal(format!("cannot encode snapshot: {e}")))?;
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| RepoError::Internal(format!("cannot create '{}': {e}", dir.display())))?;
            }
            tokio::fs::write(path, bytes)
                .await
                .map_err(|e| RepoError::Internal(format!("cannot write snapshot '{}': {e}", path.display())))
        }

        /// Replaces `current` with `next` once the snapshot of `next` is written.
        /// On failure `current` is left as it was.
        async fn commit(&self, current: &mut State, next: State) -> RepoResult<()> {
            self.persist(&next).await?;
            *current = next;
            Ok(())
        }
    }

    #[async_trait]
    impl FolderRepo for InMemRepo {
        async fn list_folders(&self) -> RepoResult<Vec<Folder>> {
            let s = self.state.read().await;
            Ok(s.folders.values().cloned().collect())
        }

        async fn get_folder(&self, id: Id) -> RepoResult<Option<Folder>> {
            let s = self.state.read().await;
            Ok(s.folders.get(&id).cloned())
        }

        async fn insert_folder(&self, new: NewFolder) -> RepoResult<Folder> {
            let mut s = self.state.write().await;
            let mut next = s.clone();
            next.last_folder_id += 1;
            let folder = Folder { id: next.last_folder_id, name: new.name };
            next.folders.insert(folder.id, folder.clone());
            self.commit(&mut s, next).await?;
            Ok(folder)
        }

        async fn update_folder(&self, id: Id, patch: FolderPatch) -> RepoResult<u64> {
            let mut s = self.state.write().await;
            let mut next = s.clone();
            let Some(folder) = next.folders.get_mut(&id) else { return Ok(0) };
            if let Some(name) = patch.name { folder.name = name; }
            self.commit(&mut s, next).await?;
            Ok(1)
        }

        async fn delete_folder(&self, id: Id) -> RepoResult<u64> {
            let mut s = self.state.write().await;
            let mut next = s.clone();
            if next.folders.remove(&id).is_none() {
                return Ok(0);
            }
            // mirrors ON DELETE CASCADE on notes.folder_id
            next.notes.retain(|_, note| note.folder_id != id);
            self.commit(&mut s, next).await?;
            Ok(1)
        }
    }

    #[async_trait]
    impl NoteRepo for InMemRepo {
        async fn list_notes(&self) -> RepoResult<Vec<Note>> {
            let s = self.state.read().await;
            Ok(s.notes.values().cloned().collect())
        }

        async fn get_note(&self, id: Id) -> RepoResult<Option<Note>> {
            let s = self.state.read().await;
            Ok(s.notes.get(&id).cloned())
        }

        async fn insert_note(&self, new: NewNote) -> RepoResult<Note> {
            let mut s = self.state.write().await;
            if !s.folders.contains_key(&new.folder_id) {
                return Err(RepoError::Constraint(format!(
                    "folder_id {} does not reference an existing folder",
                    new.folder_id
                )));
            }
            let mut next = s.clone();
            next.last_note_id += 1;
            let note = Note {
                id: next.last_note_id,
                name: new.name,
                folder_id: new.folder_id,
                content: new.content,
                modified: Utc::now(),
            };
            next.notes.insert(note.id, note.clone());
            self.commit(&mut s, next).await?;
            Ok(note)
        }

        async fn update_note(&self, id: Id, patch: NotePatch) -> RepoResult<u64> {
            let mut s = self.state.write().await;
            let mut next = s.clone();
            let Some(note) = next.notes.get_mut(&id) else { return Ok(0) };
            if let Some(name) = patch.name { note.name = name; }
            if let Some(content) = patch.content { note.content = content; }
            self.commit(&mut s, next).await?;
            Ok(1)
        }

        async fn delete_note(&self, id: Id) -> RepoResult<u64> {
            let mut s = self.state.write().await;
            let mut next = s.clone();
            if next.notes.remove(&id).is_none() {
                return Ok(0);
            }
            self.commit(&mut s, next).await?;
            Ok(1)
        }
    }
}

// Postgres implementation (feature = "postgres-store")
#[cfg(feature = "postgres-store")]
pub mod pg {
    use super::*;
    use sqlx::{Pool, Postgres};

    #[derive(Clone)]
    pub struct PgRepo { pool: Pool<Postgres> }

    impl PgRepo {
        pub fn new(pool: Pool<Postgres>) -> Self { Self { pool } }
    }

    #[async_trait]
    impl FolderRepo for PgRepo {
        async fn list_folders(&self) -> RepoResult<Vec<Folder>> {
            let recs = sqlx::query_as::<_, Folder>("SELECT id, name FROM folders ORDER BY id")
                .fetch_all(&self.pool).await?;
            Ok(recs)
        }
        async fn get_folder(&self, id: Id) -> RepoResult<Option<Folder>> {
            let rec = sqlx::query_as::<_, Folder>("SELECT id, name FROM folders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool).await?;
            Ok(rec)
        }
        async fn insert_folder(&self, new: NewFolder) -> RepoResult<Folder> {
            let rec = sqlx::query_as::<_, Folder>("INSERT INTO folders (name) VALUES ($1) RETURNING id, name")
                .bind(&new.name)
                .fetch_one(&self.pool).await?;
            Ok(rec)
        }
        async fn update_folder(&self, id: Id, patch: FolderPatch) -> RepoResult<u64> {
            let res = sqlx::query("UPDATE folders SET name = COALESCE($2, name) WHERE id = $1")
                .bind(id)
                .bind(patch.name)
                .execute(&self.pool).await?;
            Ok(res.rows_affected())
        }
        async fn delete_folder(&self, id: Id) -> RepoResult<u64> {
            let res = sqlx::query("DELETE FROM folders WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await?;
            Ok(res.rows_affected())
        }
    }

    #[async_trait]
    impl NoteRepo for PgRepo {
        async fn list_notes(&self) -> RepoResult<Vec<Note>> {
            let recs = sqlx::query_as::<_, Note>("SELECT id, name, folder_id, content, modified FROM notes ORDER BY id")
                .fetch_all(&self.pool).await?;
            Ok(recs)
        }
        async fn get_note(&self, id: Id) -> RepoResult<Option<Note>> {
            let rec = sqlx::query_as::<_, Note>("SELECT id, name, folder_id, content, modified FROM notes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool).await?;
            Ok(rec)
        }
        async fn insert_note(&self, new: NewNote) -> RepoResult<Note> {
            let rec = sqlx::query_as::<_, Note>(
                "INSERT INTO notes (name, folder_id, content) VALUES ($1,$2,$3) RETURNING id, name, folder_id, content, modified"
            )
            .bind(&new.name)
            .bind(new.folder_id)
            .bind(&new.content)
            .fetch_one(&self.pool).await?;
            Ok(rec)
        }
        async fn update_note(&self, id: Id, patch: NotePatch) -> RepoResult<u64> {
            let res = sqlx::query(
                "UPDATE notes SET name = COALESCE($2, name), content = COALESCE($3, content) WHERE id = $1"
            )
            .bind(id)
            .bind(patch.name)
            .bind(patch.content)
            .execute(&self.pool).await?;
            Ok(res.rows_affected())
        }
        async fn delete_note(&self, id: Id) -> RepoResult<u64> {
            let res = sqlx::query("DELETE FROM notes WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await?;
            Ok(res.rows_affected())
        }
    }
}
