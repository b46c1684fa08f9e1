//! Storage subsystem
//!
//! This module provides the record store: the abstraction that persists the
//! whole story catalog and loads it back.
//!
//! Components:
//! - `storage_trait`: the `RecordStore` trait defining the load/save contract.
//! - `types`: the persisted `Story` record.
//! - `file_storage`: single JSON document implementation with atomic replace.
//! - `memory_storage`: in-process implementation for tests and embedding.

pub mod file_storage;
pub mod memory_storage;
pub mod storage_trait;
pub mod types;

pub use file_storage::JsonFileStore;
pub use memory_storage::MemoryStore;
pub use storage_trait::RecordStore;
pub use types::Story;
