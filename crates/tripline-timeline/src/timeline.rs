use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use tripline_core::{
    AppError, DocumentPatch, DocumentRecord, FileRef, ParseError, ParsedDocument, UploadedFile,
};
use tripline_parser::DocumentAnalyzer;
use tripline_store::DocumentStore;

/// One row of the rendered timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub display_name: String,
    pub scheduled_at: NaiveDateTime,
    pub content_type: String,
    pub file_size: usize,
    /// An extraction call for this record is outstanding.
    pub parsing: bool,
}

impl TimelineEntry {
    fn from_record(record: &DocumentRecord, parsing: bool) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.clone(),
            scheduled_at: record.scheduled_at,
            content_type: record.file.content_type().to_string(),
            file_size: record.file.size(),
            parsing,
        }
    }
}

/// An extraction call detached from the timeline, so the interface stays
/// responsive while the call is outstanding. Obtained from
/// [`Timeline::begin_parse`]; its outcome goes back through
/// [`Timeline::apply_parse`].
pub struct ParseJob {
    id: Uuid,
    file: FileRef,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl std::fmt::Debug for ParseJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseJob")
            .field("id", &self.id)
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

impl ParseJob {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn run(self) -> (Uuid, Result<ParsedDocument, ParseError>) {
        let result = self.analyzer.analyze(&self.file).await;
        (self.id, result)
    }
}

/// View model for the document timeline.
pub struct Timeline {
    store: DocumentStore,
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    pending: HashSet<Uuid>,
}

impl Timeline {
    /// Timeline without an extraction service; parse actions are refused.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            analyzer: None,
            pending: HashSet::new(),
        }
    }

    pub fn with_analyzer(store: DocumentStore, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self {
            store,
            analyzer: Some(analyzer),
            pending: HashSet::new(),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Rows in timeline order, one per record.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.store
            .list()
            .iter()
            .map(|record| TimelineEntry::from_record(record, self.pending.contains(&record.id)))
            .collect()
    }

    /// Admit a file from an upload interaction. A multi-file batch admits
    /// only the first file; the rest are ignored.
    pub fn upload(&mut self, files: Vec<UploadedFile>) -> Result<Uuid, AppError> {
        let mut files = files.into_iter();
        let first = files
            .next()
            .ok_or_else(|| AppError::InvalidInput("no file provided".to_string()))?;

        let ignored = files.count();
        if ignored > 0 {
            tracing::debug!(ignored, "Ignoring extra files in upload batch");
        }

        self.store.add(first)
    }

    pub fn rename(&mut self, id: Uuid, name: impl Into<String>) -> Result<(), AppError> {
        self.store.update(id, DocumentPatch::rename(name))
    }

    pub fn reschedule(&mut self, id: Uuid, at: NaiveDateTime) -> Result<(), AppError> {
        self.store.update(id, DocumentPatch::reschedule(at))
    }

    /// Path of the record's preview file, materializing it on first use.
    pub fn preview(&mut self, id: Uuid) -> Result<PathBuf, AppError> {
        self.store.preview_path(id)
    }

    /// Delete the record; a pending parse for it becomes a dropped result.
    pub fn remove(&mut self, id: Uuid) -> Result<(), AppError> {
        self.store.remove(id)?;
        self.pending.remove(&id);
        Ok(())
    }

    pub fn is_parsing(&self, id: Uuid) -> bool {
        self.pending.contains(&id)
    }

    /// Start an extraction call for a record and mark it pending.
    ///
    /// Refused when no extraction service is configured, the record does
    /// not exist, or a parse for it is already outstanding.
    pub fn begin_parse(&mut self, id: Uuid) -> Result<ParseJob, AppError> {
        let analyzer = self
            .analyzer
            .clone()
            .ok_or_else(|| AppError::Config("no extraction service configured".to_string()))?;

        let record = self.store.get(id).ok_or(AppError::NotFound(id))?;

        if !self.pending.insert(id) {
            return Err(AppError::InvalidInput(
                "a parse for this document is already in progress".to_string(),
            ));
        }

        tracing::info!(document_id = %id, filename = %record.file.original_filename(), "Starting parse");

        Ok(ParseJob {
            id,
            file: record.file.clone(),
            analyzer,
        })
    }

    /// Feed an extraction outcome back into the store and clear the
    /// pending flag. A result for a record deleted meanwhile is dropped;
    /// an extraction failure surfaces to the caller for this record only.
    pub fn apply_parse(
        &mut self,
        id: Uuid,
        result: Result<ParsedDocument, ParseError>,
    ) -> Result<(), AppError> {
        self.pending.remove(&id);

        if !self.store.contains(id) {
            tracing::debug!(document_id = %id, "Dropping parse result for removed document");
            return Ok(());
        }

        match result {
            Ok(parsed) => {
                tracing::info!(
                    document_id = %id,
                    document_type = parsed.document_type.as_str(),
                    has_timestamp = parsed.timestamp.is_some(),
                    "Applying parse result"
                );
                match self.store.update(id, DocumentPatch::from_parse(&parsed)) {
                    Err(AppError::NotFound(_)) => {
                        tracing::debug!(document_id = %id, "Dropping parse result for removed document");
                        Ok(())
                    }
                    other => other,
                }
            }
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, code = e.code(), "Parse failed");
                Err(AppError::Parse(e))
            }
        }
    }

    /// Run a full extraction for one record: begin, await, apply.
    pub async fn parse(&mut self, id: Uuid) -> Result<(), AppError> {
        let job = self.begin_parse(id)?;
        let (id, result) = job.run().await;
        self.apply_parse(id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripline_core::UploadPolicy;

    fn timeline() -> Timeline {
        Timeline::new(DocumentStore::new(UploadPolicy::any(10 * 1024 * 1024)))
    }

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(vec![9u8; 4], name, "application/pdf")
    }

    #[test]
    fn test_upload_batch_admits_first_file_only() {
        let mut tl = timeline();
        let id = tl
            .upload(vec![upload("first.pdf"), upload("second.pdf"), upload("third.pdf")])
            .unwrap();
        assert_eq!(tl.store().len(), 1);
        assert_eq!(tl.store().get(id).unwrap().display_name, "first.pdf");
    }

    #[test]
    fn test_upload_empty_batch_is_invalid_input() {
        let mut tl = timeline();
        let err = tl.upload(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_without_analyzer_is_refused() {
        let mut tl = timeline();
        let id = tl.upload(vec![upload("doc.pdf")]).unwrap();
        let err = tl.begin_parse(id).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!tl.is_parsing(id));
    }

    #[test]
    fn test_entries_reflect_store_order() {
        let mut tl = timeline();
        let a = tl.upload(vec![upload("a.pdf")]).unwrap();
        let b = tl.upload(vec![upload("b.pdf")]).unwrap();
        let ids: Vec<_> = tl.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_rename_changes_entry() {
        let mut tl = timeline();
        let id = tl.upload(vec![upload("scan-0001.pdf")]).unwrap();
        tl.rename(id, "Ferry to Split").unwrap();
        assert_eq!(tl.entries()[0].display_name, "Ferry to Split");
    }
}
