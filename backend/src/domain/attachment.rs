//! Attachments and the upload validation pipeline.
//!
//! Uploaded files are read fully into memory before they reach this module;
//! validation here is pure. Policy is fixed: a hard size ceiling and an
//! extension allow-list, enforced at creation time only.

use std::ffi::OsStr;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Hard ceiling on a single attachment payload (2 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 2 * 1024 * 1024;

/// Lower-case file extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 6] = [".jpg", ".png", ".pdf", ".docx", ".doc", ".txt"];

/// A stored attachment, owned by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Storage-assigned identifier.
    pub id: i32,
    /// Owning request.
    pub request_id: i32,
    /// File name as uploaded.
    pub file_name: String,
    /// Declared content type, preserved verbatim.
    pub content_type: String,
    /// Raw file bytes.
    pub payload: Vec<u8>,
}

/// A validated attachment awaiting association with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// File name as uploaded.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    /// Raw file bytes.
    pub payload: Vec<u8>,
}

/// Attachment metadata safe to embed in list/detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    /// Storage-assigned identifier.
    pub id: i32,
    /// File name as uploaded.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
}

impl From<&Attachment> for AttachmentInfo {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id,
            file_name: attachment.file_name.clone(),
            content_type: attachment.content_type.clone(),
        }
    }
}

/// An uploaded file descriptor as handed over by the inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as submitted by the client.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    /// Full file contents.
    pub bytes: Vec<u8>,
}

/// Rejection raised by the upload validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    /// The file is oversized or its extension is not in the allow-list.
    #[error("invalid file type for {file_name}")]
    InvalidFileType {
        /// Name of the offending file.
        file_name: String,
    },
}

/// Validate a batch of uploads and materialize the accepted ones.
///
/// Zero-byte files are skipped silently ("no file provided"). A file that
/// is oversized or carries a disallowed extension aborts the whole batch
/// with [`AttachmentError::InvalidFileType`]; no partial batch is returned.
///
/// # Examples
/// ```
/// use backend::domain::attachment::{process_uploads, UploadedFile};
///
/// let accepted = process_uploads(vec![UploadedFile {
///     file_name: "notes.txt".into(),
///     content_type: "text/plain".into(),
///     bytes: b"hello".to_vec(),
/// }])
/// .expect("txt upload accepted");
/// assert_eq!(accepted.len(), 1);
/// ```
pub fn process_uploads(
    files: impl IntoIterator<Item = UploadedFile>,
) -> Result<Vec<NewAttachment>, AttachmentError> {
    let mut attachments = Vec::new();

    for file in files {
        if file.bytes.is_empty() {
            warn!(file_name = %file.file_name, "skipped empty upload");
            continue;
        }

        if file.bytes.len() >= MAX_ATTACHMENT_BYTES {
            warn!(
                file_name = %file.file_name,
                size = file.bytes.len(),
                "upload exceeds size ceiling"
            );
            return Err(AttachmentError::InvalidFileType {
                file_name: file.file_name,
            });
        }

        let allowed = file_extension(&file.file_name)
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        if !allowed {
            warn!(file_name = %file.file_name, "upload has disallowed extension");
            return Err(AttachmentError::InvalidFileType {
                file_name: file.file_name,
            });
        }

        debug!(file_name = %file.file_name, size = file.bytes.len(), "accepted upload");
        attachments.push(NewAttachment {
            file_name: file.file_name,
            content_type: file.content_type,
            payload: file.bytes,
        });
    }

    Ok(attachments)
}

/// Lower-case extension of `name` including the leading dot, if any.
fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| format!(".{}", ext.to_lowercase()))
}
