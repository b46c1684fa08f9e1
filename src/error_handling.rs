//! Error types shared by every subsystem.

pub mod types;

pub use types::{CatalogError, ConfigError, StorageError, UploadError, WebError};
