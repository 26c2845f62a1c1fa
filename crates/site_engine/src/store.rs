//! Browser-style local key-value store persisted as one JSON file.
//!
//! Writes go to a temp file in the same directory which is then renamed over
//! the target, so a crash never leaves a half-written store. There is no
//! wholesale `clear`: session teardown names the keys it owns.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use site_logging::{site_debug, site_info};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const STORE_FILENAME: &str = "local_store.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed store file: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store in `dir`, creating the directory if needed. A missing
    /// file is an empty store.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        ensure_store_dir(&dir)?;
        let path = dir.join(STORE_FILENAME);
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        site_debug!("opened local store {:?}", path);
        Ok(Self { dir, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), PersistError> {
        self.entries.insert(key.into(), value.into());
        self.flush()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Session teardown: removes exactly `keys`, leaving unrelated data alone.
    /// Returns how many were present.
    pub fn remove_keys<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<usize, PersistError> {
        let mut removed = 0;
        for key in keys {
            let key: &str = key.as_ref();
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            self.flush()?;
        }
        site_info!("session teardown removed {} of {} keys", removed, keys.len());
        Ok(removed)
    }

    fn flush(&self) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        write_atomically(&self.dir, STORE_FILENAME, &content)?;
        Ok(())
    }
}

fn ensure_store_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StoreDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
    }
    Ok(())
}

fn write_atomically(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
