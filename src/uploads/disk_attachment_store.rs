use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{error, info, warn};
use uuid::Uuid;

use crate::error_handling::types::UploadError;
use crate::uploads::attachment_store::{Attachment, AttachmentStore};

/// Public prefix under which stored files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Stores uploaded files in a flat directory.
///
/// Files are named `<unix-millis>-<random><.ext>`, so two uploads never share
/// a name even when they carry the same client filename.
pub struct DiskAttachmentStore {
    dir: PathBuf,
}

impl DiskAttachmentStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, UploadError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            error!("Failed to create uploads dir {}: {}", dir.display(), e);
            UploadError::WriteFailed
        })?;
        info!("DiskAttachmentStore initialized at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unique_name(attachment: &Attachment) -> String {
        let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
        match extension_for(attachment) {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        }
    }
}

/// Extension taken from the client filename, else guessed from the declared
/// content type.
fn extension_for(attachment: &Attachment) -> Option<String> {
    let from_name = attachment
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());
    if from_name.is_some() {
        return from_name;
    }

    attachment
        .content_type
        .as_deref()
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}

impl AttachmentStore for DiskAttachmentStore {
    fn store(&self, attachment: &Attachment) -> Result<String, UploadError> {
        if attachment.data.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let name = Self::unique_name(attachment);
        let path = self.dir.join(&name);
        fs::write(&path, &attachment.data).map_err(|e| {
            error!("Failed to write upload {}: {}", path.display(), e);
            UploadError::WriteFailed
        })?;
        info!("Stored upload of {} byte(s) as {}", attachment.data.len(), path.display());
        Ok(format!("{}/{}", UPLOADS_ROUTE, name))
    }

    fn remove(&self, reference: &str) -> Result<(), UploadError> {
        // Only bare names produced by `store` are accepted
        let name = reference
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| {
                warn!("Refusing to remove unknown upload reference {}", reference);
                UploadError::WriteFailed
            })?;

        let path = self.dir.join(name);
        fs::remove_file(&path).map_err(|e| {
            warn!("Failed to remove upload {}: {}", path.display(), e);
            UploadError::WriteFailed
        })?;
        info!("Removed upload {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn photo(filename: Option<&str>, content_type: Option<&str>) -> Attachment {
        Attachment {
            filename: filename.map(String::from),
            content_type: content_type.map(String::from),
            data: b"\xff\xd8\xff\xe0fakejpeg".to_vec(),
        }
    }

    #[test]
    fn test_store_writes_file_and_returns_public_path() {
        let dir = TempDir::new().unwrap();
        let store = DiskAttachmentStore::new(dir.path().join("uploads")).unwrap();

        let reference = store.store(&photo(Some("Beach.JPG"), Some("image/jpeg"))).unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".jpg"));

        let name = reference.trim_start_matches("/uploads/");
        let written = fs::read(store.dir().join(name)).unwrap();
        assert_eq!(written, photo(None, None).data);
    }

    #[test]
    fn test_same_filename_gets_distinct_names() {
        let dir = TempDir::new().unwrap();
        let store = DiskAttachmentStore::new(dir.path()).unwrap();
        let a = store.store(&photo(Some("me.png"), None)).unwrap();
        let b = store.store(&photo(Some("me.png"), None)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        let ext = extension_for(&photo(Some("snapshot"), Some("image/png")));
        assert_eq!(ext.as_deref(), Some("png"));
        assert_eq!(extension_for(&photo(None, None)), None);
    }

    #[test]
    fn test_suspicious_extension_is_ignored() {
        let ext = extension_for(&photo(Some("x.p/ng"), None));
        assert_eq!(ext, None);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = DiskAttachmentStore::new(dir.path()).unwrap();
        let empty = Attachment {
            filename: Some("a.jpg".into()),
            ..Default::default()
        };
        assert_eq!(store.store(&empty), Err(UploadError::EmptyFile));
    }

    #[test]
    fn test_remove_deletes_stored_file() {
        let dir = TempDir::new().unwrap();
        let store = DiskAttachmentStore::new(dir.path()).unwrap();
        let reference = store.store(&photo(Some("gone.png"), None)).unwrap();

        store.remove(&reference).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(store.remove(&reference), Err(UploadError::WriteFailed));
    }

    #[test]
    fn test_remove_rejects_foreign_references() {
        let dir = TempDir::new().unwrap();
        let store = DiskAttachmentStore::new(dir.path().join("uploads")).unwrap();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();

        assert_eq!(store.remove("/uploads/../keep.txt"), Err(UploadError::WriteFailed));
        assert_eq!(store.remove("/public/keep.txt"), Err(UploadError::WriteFailed));
        assert_eq!(store.remove("/uploads/"), Err(UploadError::WriteFailed));
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_blank_part_detection() {
        assert!(Attachment::default().is_blank());
        assert!(Attachment { filename: Some(String::new()), ..Default::default() }.is_blank());
        assert!(!photo(None, None).is_blank());
    }
}
