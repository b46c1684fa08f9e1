use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadIPFormatting(String),
    DirectoryDoesNotExist(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Failures of the record store. Every variant means the catalog document
/// could not be read or replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    ReadFailed,
    WriteFailed,
    Corrupt(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed => write!(f, "Storage read failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::Corrupt(e) => write!(f, "Storage document is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    EmptyFile,
    WriteFailed,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::EmptyFile => write!(f, "Uploaded file is empty"),
            UploadError::WriteFailed => write!(f, "Uploaded file could not be stored"),
        }
    }
}

impl std::error::Error for UploadError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Validation(String),
    NotFound(String),
    BadRequest(String),
    StoreUnavailable(StorageError),
    Upload(UploadError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(e) => write!(f, "Validation error: {}", e),
            CatalogError::NotFound(id) => write!(f, "Story not found: {}", id),
            CatalogError::BadRequest(e) => write!(f, "Bad request: {}", e),
            CatalogError::StoreUnavailable(e) => write!(f, "Store unavailable: {}", e),
            CatalogError::Upload(e) => write!(f, "Upload error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        CatalogError::StoreUnavailable(err)
    }
}

impl From<UploadError> for CatalogError {
    fn from(err: UploadError) -> Self {
        CatalogError::Upload(err)
    }
}

#[derive(Debug)]
pub enum WebError {
    BindFailed(String),
    InitializationFailed(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BindFailed(e) => write!(f, "Web server bind failed: {}", e),
            WebError::InitializationFailed(e) => write!(f, "Web server initialization failed: {}", e),
        }
    }
}

impl std::error::Error for WebError {}
