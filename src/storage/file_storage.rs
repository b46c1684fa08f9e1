use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use uuid::Uuid;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::RecordStore;
use crate::storage::types::Story;

/// Record store backed by a single pretty-printed JSON document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create catalog dir {}: {}", parent.display(), e);
                StorageError::WriteFailed
            })?;
        }
        info!("JsonFileStore initialized at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Sibling of the document so the final rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stories.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }

    fn write_document(&self, stories: &[Story]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(stories).map_err(|e| {
            error!("Failed to serialize catalog: {}", e);
            StorageError::WriteFailed
        })?;

        let tmp = self.temp_path();
        let written = File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(body.as_bytes())?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            error!("Failed to replace catalog {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::WriteFailed);
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Story>, StorageError> {
        if !self.path.exists() {
            info!("No catalog at {}, creating an empty one", self.path.display());
            self.write_document(&[])?;
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            error!("Failed to read catalog {}: {}", self.path.display(), e);
            StorageError::ReadFailed
        })?;
        let stories: Vec<Story> = serde_json::from_str(&raw).map_err(|e| {
            error!("Catalog {} is not valid JSON: {}", self.path.display(), e);
            StorageError::Corrupt(e.to_string())
        })?;
        debug!("Loaded {} story(ies) from {}", stories.len(), self.path.display());
        Ok(stories)
    }

    fn save(&self, stories: &[Story]) -> Result<(), StorageError> {
        self.write_document(stories)?;
        debug!("Saved {} story(ies) to {}", stories.len(), self.path.display());
        Ok(())
    }
}
