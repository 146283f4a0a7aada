//! Filesystem-backed icon store.
//!
//! Blobs live as one file per key inside a capability-scoped directory, so a
//! key can never address anything outside it. Writes go to a uniquely named
//! staging file first and are renamed into place.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use uuid::Uuid;

use crate::domain::IconKey;
use crate::domain::ports::{IconStore, IconStoreError};

/// [`IconStore`] over a directory on local disk.
#[derive(Clone)]
pub struct FsIconStore {
    dir: Arc<Dir>,
}

impl FsIconStore {
    /// Open (creating if needed) the icon directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IconStoreError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IconStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| io_error(path.display(), &err))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| io_error(path.display(), &err))?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, IconStoreError>
    where
        F: FnOnce(&Dir) -> Result<T, IconStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(dir.as_ref()))
            .await
            .map_err(|err| IconStoreError::io(format!("icon store task failed: {err}")))?
    }
}

fn io_error(target: impl std::fmt::Display, error: &io::Error) -> IconStoreError {
    IconStoreError::io(format!("{target}: {error}"))
}

#[async_trait]
impl IconStore for FsIconStore {
    async fn get(&self, key: &IconKey) -> Result<Option<String>, IconStoreError> {
        let name = key.as_str().to_owned();
        self.blocking(move |dir| match dir.read_to_string(&name) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                Err(IconStoreError::corrupt(name))
            }
            Err(err) => Err(io_error(&name, &err)),
        })
        .await
    }

    async fn put(&self, key: &IconKey, blob: &str) -> Result<(), IconStoreError> {
        let name = key.as_str().to_owned();
        let blob = blob.to_owned();
        self.blocking(move |dir| {
            let staging = format!(".tmp-{name}-{}", Uuid::new_v4().simple());
            dir.write(&staging, blob.as_bytes())
                .map_err(|err| io_error(&staging, &err))?;
            dir.rename(&staging, dir, &name).map_err(|err| {
                let _ = dir.remove_file(&staging);
                io_error(&name, &err)
            })
        })
        .await
    }
}
