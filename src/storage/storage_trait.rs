//! Record Store Trait
//!
//! This module defines the `RecordStore` trait, the durability boundary of the
//! story catalog.
//!
//! The contract is deliberately whole-document: implementors load the complete
//! catalog and replace it wholesale. There is no partial update primitive, so
//! every mutation is read-all, modify-in-memory, write-all.

use crate::error_handling::types::StorageError;
use crate::storage::types::Story;

/// The `RecordStore` trait defines the interface for catalog persistence backends.
///
/// Stories are kept newest first. A `load` must reflect the latest `save`
/// that returned `Ok`.
pub trait RecordStore: Send + Sync {
    /// Reads the entire catalog.
    ///
    /// On first use, when no document exists yet, the backend initializes an
    /// empty catalog and returns it.
    fn load(&self) -> Result<Vec<Story>, StorageError>;

    /// Replaces the entire catalog.
    ///
    /// - `stories` - The full catalog, newest first.
    fn save(&self, stories: &[Story]) -> Result<(), StorageError>;
}
