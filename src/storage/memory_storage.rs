use std::sync::Mutex;

use log::error;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::RecordStore;
use crate::storage::types::Story;

/// Volatile record store. Useful for tests and for embedding the catalog
/// without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    stories: Mutex<Vec<Story>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stories(stories: Vec<Story>) -> Self {
        Self {
            stories: Mutex::new(stories),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<Story>, StorageError> {
        let stories = self.stories.lock().map_err(|_| {
            error!("MemoryStore lock poisoned on load");
            StorageError::ReadFailed
        })?;
        Ok(stories.clone())
    }

    fn save(&self, stories: &[Story]) -> Result<(), StorageError> {
        let mut current = self.stories.lock().map_err(|_| {
            error!("MemoryStore lock poisoned on save");
            StorageError::WriteFailed
        })?;
        *current = stories.to_vec();
        Ok(())
    }
}
