use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error, info};
use thiserror::Error;
use tokio::{fs, sync::Mutex};

use crate::modules::store::{model::Document, seed::sample_document};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt store file {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("No post ids left above {0}")]
    IdsExhausted(i64),
}

/// Single JSON file holding users, posts and likes.
///
/// Every call is a full file round-trip; nothing is cached. Mutations go
/// through [`FileStore::update`], which holds the store lock for the whole
/// read-modify-write cycle so that concurrent callers in this process cannot
/// lose each other's updates.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, seeding the file on first use. Any failure is
    /// logged and an empty document is returned instead.
    pub async fn read(&self) -> Document {
        let _guard = self.lock.lock().await;
        match self.load().await {
            Ok(document) => document,
            Err(e) => {
                error!("Error reading store {}: {}", self.path.display(), e);
                Document::default()
            }
        }
    }

    /// Overwrites the whole file with `document`.
    pub async fn write(&self, document: &Document) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.persist(document).await
    }

    /// Runs `mutate` against a freshly loaded document and persists the
    /// result. A document that cannot be parsed is reported as
    /// [`StoreError::Corrupt`] and left untouched on disk. When `mutate`
    /// fails nothing is written.
    pub async fn update<T, E, F>(&self, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let result = mutate(&mut document)?;
        self.persist(&document).await?;
        Ok(result)
    }

    async fn load(&self) -> Result<Document, StoreError> {
        self.ensure_initialized().await?;
        let raw = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn ensure_initialized(&self) -> Result<(), StoreError> {
        self.ensure_directory().await?;
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        info!("Store file {} not found, seeding sample data", self.path.display());
        self.persist(&sample_document(Utc::now())).await
    }

    async fn ensure_directory(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // Written to a sibling file first and renamed into place so that a
    // reader never sees a half-written document.
    async fn persist(&self, document: &Document) -> Result<(), StoreError> {
        self.ensure_directory().await?;
        let json = serde_json::to_vec_pretty(document)?;
        let staging = self.staging_path();
        fs::write(&staging, json).await?;
        fs::rename(&staging, &self.path).await?;
        debug!(
            "Persisted store {} ({} users, {} posts, {} likes)",
            self.path.display(),
            document.users.len(),
            document.posts.len(),
            document.likes.len()
        );
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
