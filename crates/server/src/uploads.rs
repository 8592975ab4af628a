//! Attachment storage for notifications.
//!
//! Files live under `<root>/notifications` with a uuid-prefixed, sanitised
//! name. Access control stays with the handlers; this module only moves
//! bytes and enforces the upload constraints.

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_ATTACHMENTS: usize = 5;
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 7] = [
    "application/pdf",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttachment {
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: PathBuf) -> Self {
        AttachmentStore { root }
    }

    fn notifications_dir(&self) -> PathBuf {
        self.root.join("notifications")
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.notifications_dir()).await
    }

    pub fn is_allowed_mime(mimetype: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&mimetype)
    }

    /// Strip anything that could escape the upload directory.
    fn sanitize(original_name: &str) -> String {
        original_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub async fn save(
        &self,
        original_name: &str,
        mimetype: &str,
        bytes: &[u8],
    ) -> Result<StoredAttachment, ApiError> {
        if !Self::is_allowed_mime(mimetype) {
            return Err(ApiError::validation(
                "Invalid file type. Only PDF, Excel, and image files are allowed.",
            ));
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(ApiError::validation("File too large. Limit is 10MB."));
        }

        let filename = format!("{}-{}", Uuid::new_v4(), Self::sanitize(original_name));
        let path = self.notifications_dir().join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::internal(format!("failed to store attachment: {e}")))?;

        Ok(StoredAttachment {
            filename: filename.clone(),
            original_name: original_name.to_string(),
            mimetype: mimetype.to_string(),
            size: bytes.len() as u64,
            url: format!("/uploads/notifications/{filename}"),
            uploaded_at: Utc::now(),
        })
    }

    /// Resolve a stored filename, rejecting anything path-like.
    fn path_for(&self, filename: &str) -> Result<PathBuf, ApiError> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(ApiError::not_found("Attachment not found"));
        }
        Ok(self.notifications_dir().join(filename))
    }

    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let path = self.path_for(filename)?;
        tokio::fs::read(&path)
            .await
            .map_err(|_| ApiError::not_found("File not found on server"))
    }

    /// Best effort: a missing file is not an error during cleanup.
    pub async fn remove(&self, filename: &str) {
        if let Ok(path) = self.path_for(filename) {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                log::warn!("failed to delete attachment {filename}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mime_allowlist() {
        assert!(AttachmentStore::is_allowed_mime("application/pdf"));
        assert!(AttachmentStore::is_allowed_mime("image/png"));
        assert!(!AttachmentStore::is_allowed_mime("text/html"));
        assert!(!AttachmentStore::is_allowed_mime("application/zip"));
    }

    #[test]
    fn test_sanitize_strips_separators() {
        assert_eq!(AttachmentStore::sanitize("../../etc/passwd"), ".._.._etc_passwd");
        assert!(!AttachmentStore::sanitize("a/b\\c.pdf").contains('/'));
        assert_eq!(AttachmentStore::sanitize("bulletin T1.pdf"), "bulletin_T1.pdf");
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = AttachmentStore::new(PathBuf::from("/tmp/uploads"));
        assert!(store.path_for("../secret").is_err());
        assert!(store.path_for("a/b.pdf").is_err());
        assert!(store.path_for("ok-file.pdf").is_ok());
    }
}
