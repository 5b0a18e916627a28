use bytes::Bytes;
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::models::parse::ParsedDocument;

/// Hour of day a freshly added document is scheduled at.
const DEFAULT_SCHEDULED_HOUR: u32 = 10;

/// Default scheduled time for a new record: today at 10:00 local.
pub fn default_scheduled_at() -> NaiveDateTime {
    let ten_am = NaiveTime::from_hms_opt(DEFAULT_SCHEDULED_HOUR, 0, 0)
        .expect("constant wall-clock time is valid");
    Local::now().date_naive().and_time(ten_am)
}

/// A file handed over by the upload surface, before admission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub original_filename: String,
    pub content_type: String,
}

impl UploadedFile {
    pub fn new(
        bytes: impl Into<Bytes>,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            original_filename: original_filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The file owned by a document record.
///
/// The store never attaches one `FileRef` to two records; clones exist only
/// transiently, to hand the bytes to a parse call for the same record.
#[derive(Debug, Clone)]
pub struct FileRef {
    bytes: Bytes,
    original_filename: String,
    content_type: String,
}

impl FileRef {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl From<UploadedFile> for FileRef {
    fn from(upload: UploadedFile) -> Self {
        FileRef {
            bytes: upload.bytes,
            original_filename: upload.original_filename,
            content_type: upload.content_type,
        }
    }
}

/// One tracked travel document.
///
/// `id` and `created_at` are fixed at creation; `display_name` and
/// `scheduled_at` change through user edits and parse results. `created_at`
/// is informational only and never drives ordering.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub display_name: String,
    pub scheduled_at: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub file: FileRef,
    seq: u64,
}

impl DocumentRecord {
    /// Create a record with defaults: display name from the original
    /// filename, scheduled today at 10:00 local. `seq` is the store's
    /// insertion sequence, used to keep equal timestamps in arrival order.
    pub fn new(file: FileRef, seq: u64) -> Self {
        let display_name = file.original_filename().to_string();
        Self {
            id: Uuid::new_v4(),
            display_name,
            scheduled_at: default_scheduled_at(),
            created_at: Utc::now(),
            file,
            seq,
        }
    }

    /// Insertion sequence within the owning store.
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    /// Key the store orders records by.
    pub fn sort_key(&self) -> (NaiveDateTime, u64) {
        (self.scheduled_at, self.seq)
    }
}

/// Partial update applied to a record: only the present fields change.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub display_name: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
}

impl DocumentPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn reschedule(at: NaiveDateTime) -> Self {
        Self {
            scheduled_at: Some(at),
            ..Self::default()
        }
    }

    /// The fields of a parse result that feed back into a record: the
    /// extracted name, and the timestamp when the document stated one.
    pub fn from_parse(parsed: &ParsedDocument) -> Self {
        Self {
            display_name: Some(parsed.document_name.clone()),
            scheduled_at: parsed.timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.scheduled_at.is_none()
    }
}
