//! Attachment Store Trait
//!
//! The attachment store accepts an uploaded binary blob, stores it durably
//! and hands back a stable public path under which it is served. Avoiding
//! name collisions is the store's job, not the caller's.

use crate::error_handling::types::UploadError;

/// A file received with a story submission.
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    /// Filename as sent by the client, if any.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Browsers submit an empty, nameless part when no file was chosen.
    pub fn is_blank(&self) -> bool {
        self.data.is_empty() && self.filename.as_deref().map_or(true, str::is_empty)
    }
}

pub trait AttachmentStore: Send + Sync {
    /// Persists the attachment and returns its public reference path.
    fn store(&self, attachment: &Attachment) -> Result<String, UploadError>;

    /// Deletes a previously stored attachment given the reference `store`
    /// returned for it.
    fn remove(&self, reference: &str) -> Result<(), UploadError>;
}
