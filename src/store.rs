use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::record::{AppRecord, Pricing};
use crate::transfer::{decode_text, normalize_all};

/// Persistence for the app list. Every write replaces the whole list.
pub trait AppStore {
    /// Best effort: a missing, unreadable or malformed list is an empty list.
    /// Records with missing or odd fields are kept and coerced.
    fn load(&self) -> Vec<AppRecord>;
    fn save(&self, list: &[AppRecord]) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileAppStore {
    path: PathBuf,
}

impl FileAppStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::data_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileAppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore for FileAppStore {
    fn load(&self) -> Vec<AppRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read app list");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&decode_text(&bytes)) {
            Ok(Value::Array(items)) => normalize_all(&items, Pricing::from_stored),
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "stored app list is not an array, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "stored app list is malformed, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, list: &[AppRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(list)?;
        fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), count = list.len(), "saved app list");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "cleared app list");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryAppStore {
    list: RefCell<Option<Vec<AppRecord>>>,
}

impl MemoryAppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(list: Vec<AppRecord>) -> Self {
        Self {
            list: RefCell::new(Some(list)),
        }
    }
}

impl AppStore for MemoryAppStore {
    fn load(&self) -> Vec<AppRecord> {
        self.list.borrow().clone().unwrap_or_default()
    }

    fn save(&self, list: &[AppRecord]) -> Result<()> {
        *self.list.borrow_mut() = Some(list.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.list.borrow_mut() = None;
        Ok(())
    }
}
