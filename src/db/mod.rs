/// Persistence Engine
///
/// Owns the canonical record set in memory and mirrors it to a single JSON
/// file. Every committed mutation rewrites the whole file; there is no log and
/// no batching.
///
/// Locking: one reader/writer lock. `read` holds the shared side for the
/// duration of the derive. `mutate` holds the exclusive side across
/// clone → apply → save → swap, so checks made inside the closure (email
/// uniqueness, id assignment, ownership) cannot race with another writer.

mod models;

pub use models::{
    Chirp, ChirpId, PublicUser, RefreshTokenRecord, Snapshot, TokenState, User, UserId,
};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{AppError, DatabaseError};

pub struct Database {
    path: PathBuf,
    snapshot: RwLock<Snapshot>,
}

impl Database {
    /// Open the store at `path`, creating an empty one if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Self::load(&path)?;

        tracing::info!(
            path = %path.display(),
            users = snapshot.users.len(),
            chirps = snapshot.chirps.len(),
            version = snapshot.version,
            "Database opened"
        );

        Ok(Self {
            path,
            snapshot: RwLock::new(snapshot),
        })
    }

    /// Read the durable store.
    ///
    /// - absent: the file is created empty and an empty snapshot returned
    /// - empty (or whitespace only): empty snapshot
    /// - malformed: `DatabaseError::Corrupt`, nothing is repaired
    pub fn load(path: &Path) -> Result<Snapshot, DatabaseError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = non_empty_parent(path) {
                    fs::create_dir_all(parent).map_err(|e| DatabaseError::Io(e.to_string()))?;
                }
                fs::File::create(path).map_err(|e| DatabaseError::Io(e.to_string()))?;
                tracing::info!(path = %path.display(), "Database file created");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(DatabaseError::Io(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Snapshot::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Database file is malformed");
            DatabaseError::Corrupt(e.to_string())
        })
    }

    /// Write the complete snapshot to a sibling temp file, sync it, then
    /// rename it over `path`. Readers of the file see the old or the new
    /// state, never a partial write.
    pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), DatabaseError> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| DatabaseError::Io(format!("failed to serialize snapshot: {}", e)))?;

        let dir = non_empty_parent(path).unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| DatabaseError::Io(e.to_string()))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| DatabaseError::Io(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| DatabaseError::Io(e.error.to_string()))?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derive a value from the current snapshot under the shared lock.
    pub fn read<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Snapshot) -> T,
    {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Apply `f` to a copy of the snapshot under the exclusive lock and
    /// commit it. If `f` or the save fails, nothing changes.
    pub fn mutate<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, AppError>,
    {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| DatabaseError::LockPoisoned)?;

        let mut next = guard.clone();
        let out = f(&mut next)?;
        next.version += 1;

        Self::save(&self.path, &next)?;
        *guard = next;

        Ok(out)
    }

    /// Drop every record and persist the empty store. Id counters survive.
    pub fn reset(&self) -> Result<(), AppError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| DatabaseError::LockPoisoned)?;

        let empty = guard.cleared();
        Self::save(&self.path, &empty)?;
        *guard = empty;

        tracing::warn!(path = %self.path.display(), "Database reset");
        Ok(())
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
