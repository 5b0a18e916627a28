use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use uuid::Uuid;

use tripline_core::{AppError, DocumentPatch, DocumentRecord, UploadPolicy, UploadedFile};

/// In-memory collection of document records, kept sorted by scheduled time.
///
/// Every mutation re-establishes the order before returning, so readers
/// never observe an unsorted state. Ties sort by insertion sequence, so two
/// records with the same scheduled time never swap places.
#[derive(Debug)]
pub struct DocumentStore {
    policy: UploadPolicy,
    records: Vec<DocumentRecord>,
    next_seq: u64,
    // Preview temp files, keyed by record id. Removed together with the
    // record; dropping the handle deletes the file.
    previews: HashMap<Uuid, NamedTempFile>,
}

impl DocumentStore {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            records: Vec::new(),
            next_seq: 0,
            previews: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Admit a file and create its record with defaults. Returns the new
    /// record id, or the validation error when the policy rejects the file;
    /// no record is created on rejection.
    pub fn add(&mut self, upload: UploadedFile) -> Result<Uuid, AppError> {
        self.policy.admit(&upload)?;

        let seq = self.next_seq;
        self.next_seq += 1;

        let record = DocumentRecord::new(upload.into(), seq);
        let id = record.id;

        tracing::info!(
            document_id = %id,
            filename = %record.file.original_filename(),
            content_type = %record.file.content_type(),
            file_size = record.file.size(),
            "Admitted document"
        );

        self.records.push(record);
        self.resort();
        Ok(id)
    }

    /// Merge the patch into the record. Re-sorts when the scheduled time
    /// changed. Reapplying the same fields is a no-op.
    pub fn update(&mut self, id: Uuid, patch: DocumentPatch) -> Result<(), AppError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound(id))?;

        if let Some(name) = patch.display_name {
            record.display_name = name;
        }

        let mut reschedule = false;
        if let Some(at) = patch.scheduled_at {
            reschedule = record.scheduled_at != at;
            record.scheduled_at = at;
        }

        tracing::debug!(document_id = %id, rescheduled = reschedule, "Updated document");

        if reschedule {
            self.resort();
        }
        Ok(())
    }

    /// Delete the record, dropping its file bytes and any preview temp
    /// file. A second remove of the same id returns `NotFound`.
    pub fn remove(&mut self, id: Uuid) -> Result<(), AppError> {
        let position = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::NotFound(id))?;

        self.records.remove(position);
        self.previews.remove(&id);

        tracing::info!(document_id = %id, "Removed document");
        Ok(())
    }

    /// Current records in timeline order. Read-only; never mutates.
    pub fn list(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Materialize the record's bytes to a temp file for preview and return
    /// its path. The file is created once per record and lives until the
    /// record is removed.
    pub fn preview_path(&mut self, id: Uuid) -> Result<PathBuf, AppError> {
        let record = self
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound(id))?;

        if let Some(existing) = self.previews.get(&id) {
            return Ok(existing.path().to_path_buf());
        }

        let mut file = NamedTempFile::new()?;
        file.write_all(record.file.bytes())?;
        file.flush()?;
        let path = file.path().to_path_buf();

        tracing::debug!(document_id = %id, path = %path.display(), "Materialized preview");

        self.previews.insert(id, file);
        Ok(path)
    }

    /// Path of an already materialized preview, if any.
    pub fn existing_preview(&self, id: Uuid) -> Option<&Path> {
        self.previews.get(&id).map(|f| f.path())
    }

    fn resort(&mut self) {
        self.records.sort_by_key(|r| r.sort_key());
    }
}
