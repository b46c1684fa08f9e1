pub mod configuration;
pub use configuration::Config;

pub mod error_handling;
pub use error_handling::{CatalogError, ConfigError, StorageError, UploadError, WebError};

pub mod storage;
pub use storage::{JsonFileStore, MemoryStore, RecordStore, Story};

pub mod catalog;
pub use catalog::{NewStory, QueryEngine, StoryPage, StoryQuery, SubmissionHandler};

pub mod uploads;
pub use uploads::{Attachment, AttachmentStore, DiskAttachmentStore};

pub mod web_interface;
pub use web_interface::WebServer;
