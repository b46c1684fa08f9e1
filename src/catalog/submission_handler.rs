use std::sync::{Arc, Mutex};

use chrono::{SubsecRound, Utc};
use log::{error, info, warn};

use crate::catalog::id_generator::IdGenerator;
use crate::catalog::types::NewStory;
use crate::error_handling::types::{CatalogError, StorageError};
use crate::storage::storage_trait::RecordStore;
use crate::storage::types::Story;
use crate::uploads::attachment_store::{Attachment, AttachmentStore};

/// Write side of the catalog.
///
/// # Fields Overview
///
/// - `store`: where the catalog is read from and written back to
/// - `attachments`: keeps uploaded photos and resolves their public path
/// - `ids`: id strategy for new stories
/// - `write_lock`: serializes the load-prepend-save cycle so concurrent
///   submissions never overwrite each other
pub struct SubmissionHandler {
    store: Arc<dyn RecordStore>,
    attachments: Arc<dyn AttachmentStore>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Mutex<()>,
}

impl SubmissionHandler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        attachments: Arc<dyn AttachmentStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            attachments,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    /// Validates the payload, stores the optional photo and prepends the new
    /// story to the catalog.
    pub fn submit(&self, payload: NewStory, attachment: Option<&Attachment>) -> Result<Story, CatalogError> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(CatalogError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let image_url = match attachment.filter(|a| !a.is_blank()) {
            Some(a) => self.attachments.store(a)?,
            None => String::new(),
        };

        let persisted = self.persist(payload, image_url.clone());
        if persisted.is_err() && !image_url.is_empty() {
            // The story never made it into the catalog, so its photo goes too
            if let Err(e) = self.attachments.remove(&image_url) {
                warn!("Orphaned upload {} left behind: {}", image_url, e);
            }
        }
        let (story, count) = persisted?;

        info!("Story {} submitted ({} in catalog)", story.id, count);
        Ok(story)
    }

    /// Prepends the story under the write lock and returns it with the new
    /// catalog size.
    fn persist(&self, payload: NewStory, image_url: String) -> Result<(Story, usize), CatalogError> {
        let _guard = self.write_lock.lock().map_err(|_| {
            error!("Catalog write lock poisoned");
            CatalogError::StoreUnavailable(StorageError::WriteFailed)
        })?;

        let mut stories = self.store.load()?;
        let story = Story {
            id: self.ids.next_id(),
            name: payload.name.unwrap_or_default(),
            generation: payload.generation.filter(|g| !g.is_empty()),
            title: payload.title.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            contact: payload.contact.filter(|c| !c.is_empty()),
            // Millisecond precision is all the document keeps.
            date: Utc::now().trunc_subsecs(3),
            image_url,
        };
        stories.insert(0, story.clone());
        self.store.save(&stories)?;
        Ok((story, stories.len()))
    }
}
