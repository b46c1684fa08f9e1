//! Upload handling: the collaborator that keeps story photos on disk.

pub mod attachment_store;
pub mod disk_attachment_store;

pub use attachment_store::{Attachment, AttachmentStore};
pub use disk_attachment_store::{DiskAttachmentStore, UPLOADS_ROUTE};
