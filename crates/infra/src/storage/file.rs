//! JSON file key-value store

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tokio::task;
use tracing::warn;
use vioshop_core::KeyValueStore;
use vioshop_domain::{Result, VioShopError};

use crate::errors::InfraError;

/// Stores every key in a single JSON object file.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so a crash never leaves a half-written store. All access is
/// serialized through one async mutex and the file I/O runs on the blocking
/// pool.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Entries = BTreeMap<String, String>;

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the parsed entries on the blocking pool, writing them
    /// back when it returns `true`.
    async fn with_entries<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Entries) -> (T, bool) + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        task::spawn_blocking(move || -> Result<T> {
            let mut entries = read_entries(&path)?;
            let (value, changed) = f(&mut entries);
            if changed {
                write_entries(&path, &entries)?;
            }
            Ok(value)
        })
        .await
        .map_err(|e| VioShopError::Internal(format!("spawn_blocking failed: {e}")))?
    }
}

fn read_entries(path: &Path) -> Result<Entries> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(err) => return Err(InfraError::from(err).into()),
    };

    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }

    match serde_json::from_str(&contents) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "store file is corrupted, starting empty");
            Ok(Entries::new())
        }
    }
}

fn write_entries(path: &Path, entries: &Entries) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(InfraError::from)?;

    let json = serde_json::to_vec_pretty(entries).map_err(InfraError::from)?;
    let mut tmp = NamedTempFile::new_in(&dir).map_err(InfraError::from)?;
    tmp.write_all(&json).map_err(InfraError::from)?;
    tmp.as_file().sync_all().map_err(InfraError::from)?;
    tmp.persist(path).map_err(InfraError::from)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_entries(move |entries| (entries.remove(&key), false)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.with_entries(move |entries| {
            entries.insert(key, value);
            ((), true)
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_entries(move |entries| ((), entries.remove(&key).is_some())).await
    }
}
