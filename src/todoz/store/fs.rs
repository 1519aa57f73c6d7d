use super::{is_valid_key, StorageBackend};
use crate::error::{Result, TodozError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_file(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(TodozError::Store(format!("Invalid slot key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TodozError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_file(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(TodozError::Io)?;
        Ok(Some(content))
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let target = self.slot_file(key)?;
        self.ensure_dir()?;

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(TodozError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(TodozError::Io(e));
        }
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        let path = self.slot_file(key)?;
        if path.exists() {
            fs::remove_file(path).map_err(TodozError::Io)?;
        }
        Ok(())
    }

    fn slot_mtime(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.slot_file(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta.modified().map_err(TodozError::Io)?.into())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TodozError::Io(e)),
        }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        self.slot_file(key)
    }
}
