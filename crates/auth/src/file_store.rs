//! Durable, file-backed session store.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;

use crate::store::{SessionStore, StorageEntries, StoreError};
use crate::{Credential, RefreshIdentity, Role, Session, TokenPair};

/// Session store persisted as one flat JSON object.
///
/// Every read goes back to disk, so a login or logout performed by another
/// process sharing the file is observed on the next call. Writes go through a
/// uniquely named temp file in the same directory and a rename, which keeps
/// the record all-or-nothing for readers.
///
/// Read-modify-write cycles hold an exclusive advisory lock on a sibling
/// `<name>.lock` file, so writers in different processes serialize instead of
/// undoing each other's updates.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<StorageEntries, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StorageEntries::default()),
            Err(err) => return Err(self.io_error(err)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "session storage is unreadable; treating as logged out"
                );
                Ok(StorageEntries::default())
            }
        }
    }

    fn persist(&self, entries: &StorageEntries) -> Result<(), StoreError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(self.io_error(err)),
            };
        }

        let data = serde_json::to_vec_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| self.io_error(e))?;
        tmp.write_all(&data).map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    /// Read-modify-write under the in-process mutex and the cross-process
    /// file lock.
    fn update<R>(&self, f: impl FnOnce(&mut StorageEntries) -> R) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(self.dir()).map_err(|e| self.io_error(e))?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;
        // Released when `lock` is closed at the end of this call.
        lock.lock().map_err(|e| self.io_error(e))?;

        let mut entries = self.load()?;
        let before = entries.clone();
        let result = f(&mut entries);
        if entries != before {
            self.persist(&entries)?;
        }
        Ok(result)
    }
}

impl SessionStore for FileSessionStore {
    fn credential(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.load()?.credential())
    }

    fn refresh_identity(&self) -> Result<Option<RefreshIdentity>, StoreError> {
        Ok(self.load()?.refresh_identity())
    }

    fn role(&self) -> Result<Option<Role>, StoreError> {
        Ok(self.load()?.role())
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.update(|e| e.apply_session(session))
    }

    fn replace_tokens(
        &self,
        sent: &RefreshIdentity,
        tokens: &TokenPair,
    ) -> Result<bool, StoreError> {
        self.update(|e| e.apply_tokens(sent, tokens))
    }

    fn remembered_email(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remembered_email)
    }

    fn set_remembered_email(&self, email: Option<&str>) -> Result<(), StoreError> {
        self.update(|e| e.remembered_email = email.map(str::to_string))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|e| *e = StorageEntries::default())
    }
}
