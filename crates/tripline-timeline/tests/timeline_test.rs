//! End-to-end timeline flows with a stubbed extraction service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Timelike};

use tripline_core::{
    default_scheduled_at, AppError, Confidence, DocumentKind, FileRef, ParseError, ParsedDocument,
    UploadPolicy, UploadedFile,
};
use tripline_parser::DocumentAnalyzer;
use tripline_store::DocumentStore;
use tripline_timeline::Timeline;

enum StubReply {
    Parsed(ParsedDocument),
    Fail,
}

struct StubAnalyzer {
    reply: StubReply,
}

#[async_trait]
impl DocumentAnalyzer for StubAnalyzer {
    async fn analyze(&self, _file: &FileRef) -> Result<ParsedDocument, ParseError> {
        match &self.reply {
            StubReply::Parsed(parsed) => Ok(parsed.clone()),
            StubReply::Fail => Err(ParseError::Service("stub failure".to_string())),
        }
    }
}

fn store() -> DocumentStore {
    init_logs();
    DocumentStore::new(UploadPolicy::any(10 * 1024 * 1024))
}

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn timeline_with(reply: StubReply) -> Timeline {
    Timeline::with_analyzer(store(), Arc::new(StubAnalyzer { reply }))
}

fn pdf(name: &str, size: usize) -> UploadedFile {
    UploadedFile::new(vec![0u8; size], name, "application/pdf")
}

fn parsed(name: &str, timestamp: Option<NaiveDateTime>) -> ParsedDocument {
    ParsedDocument {
        document_name: name.to_string(),
        document_type: DocumentKind::FlightTicket,
        timestamp,
        confidence: Confidence::High,
        ..ParsedDocument::default()
    }
}

#[test]
fn test_fresh_upload_gets_filename_and_default_schedule() {
    let mut tl = Timeline::new(store());
    let id = tl.upload(vec![pdf("booking.pdf", 2 * 1024 * 1024)]).unwrap();

    let entries = tl.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].display_name, "booking.pdf");
    assert_eq!(entries[0].file_size, 2 * 1024 * 1024);
    assert_eq!(entries[0].scheduled_at.hour(), 10);
    assert_eq!(entries[0].scheduled_at.minute(), 0);
    assert_eq!(
        entries[0].scheduled_at.date(),
        default_scheduled_at().date()
    );
    assert!(!entries[0].parsing);
}

#[tokio::test]
async fn test_parse_result_reorders_timeline() {
    let yesterday_afternoon = default_scheduled_at() - Duration::hours(20);
    let mut tl = timeline_with(StubReply::Parsed(parsed(
        "Flight LIS-BER",
        Some(yesterday_afternoon),
    )));

    let a = tl.upload(vec![pdf("a.pdf", 64)]).unwrap();
    let b = tl.upload(vec![pdf("b.pdf", 64)]).unwrap();

    tl.parse(b).await.unwrap();

    let ids: Vec<_> = tl.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b, a], "parsed record moves before the default one");
    assert_eq!(tl.entries()[0].display_name, "Flight LIS-BER");
    assert_eq!(tl.entries()[0].scheduled_at, yesterday_afternoon);
}

#[tokio::test]
async fn test_parse_without_timestamp_keeps_schedule() {
    let mut tl = timeline_with(StubReply::Parsed(parsed("Passport", None)));
    let id = tl.upload(vec![pdf("img0042.pdf", 64)]).unwrap();
    let before = tl.entries()[0].scheduled_at;

    tl.parse(id).await.unwrap();

    assert_eq!(tl.entries()[0].display_name, "Passport");
    assert_eq!(tl.entries()[0].scheduled_at, before);
}

#[tokio::test]
async fn test_pending_flag_lifecycle() {
    let mut tl = timeline_with(StubReply::Parsed(parsed("Ticket", None)));
    let id = tl.upload(vec![pdf("t.pdf", 64)]).unwrap();

    let job = tl.begin_parse(id).unwrap();
    assert!(tl.is_parsing(id));
    assert!(tl.entries()[0].parsing);

    // Re-triggering while outstanding is refused.
    assert!(matches!(
        tl.begin_parse(id).unwrap_err(),
        AppError::InvalidInput(_)
    ));

    let (id, result) = job.run().await;
    tl.apply_parse(id, result).unwrap();
    assert!(!tl.is_parsing(id));
    assert!(!tl.entries()[0].parsing);
}

#[tokio::test]
async fn test_result_for_deleted_record_is_dropped() {
    let mut tl = timeline_with(StubReply::Parsed(parsed(
        "Ghost",
        Some(default_scheduled_at() + Duration::hours(1)),
    )));
    let id = tl.upload(vec![pdf("gone.pdf", 64)]).unwrap();

    let job = tl.begin_parse(id).unwrap();
    tl.remove(id).unwrap();

    let (id, result) = job.run().await;
    // The record is gone; the late result is dropped, not an error.
    tl.apply_parse(id, result).unwrap();
    assert!(tl.entries().is_empty());
    assert!(!tl.is_parsing(id));
}

#[tokio::test]
async fn test_parse_failure_surfaces_and_leaves_other_records_alone() {
    let mut tl = timeline_with(StubReply::Fail);
    let healthy = tl.upload(vec![pdf("keep.pdf", 64)]).unwrap();
    let broken = tl.upload(vec![pdf("bad.pdf", 64)]).unwrap();
    let order_before: Vec<_> = tl.entries().iter().map(|e| e.id).collect();

    let err = tl.parse(broken).await.unwrap_err();
    assert!(matches!(err, AppError::Parse(ParseError::Service(_))));

    // Failure is scoped to the one record: flag cleared, order untouched.
    assert!(!tl.is_parsing(broken));
    let order_after: Vec<_> = tl.entries().iter().map(|e| e.id).collect();
    assert_eq!(order_before, order_after);
    assert_eq!(tl.store().get(healthy).unwrap().display_name, "keep.pdf");
}

#[tokio::test]
async fn test_manual_retry_after_failure_is_allowed() {
    let mut tl = timeline_with(StubReply::Fail);
    let id = tl.upload(vec![pdf("retry.pdf", 64)]).unwrap();

    assert!(tl.parse(id).await.is_err());
    // The pending flag is clear, so a second attempt starts cleanly.
    assert!(tl.parse(id).await.is_err());
    assert!(!tl.is_parsing(id));
}

#[test]
fn test_preview_follows_record_lifetime() {
    let mut tl = Timeline::new(store());
    let id = tl.upload(vec![pdf("map.pdf", 64)]).unwrap();

    let path = tl.preview(id).unwrap();
    assert!(path.exists());

    tl.remove(id).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_remove_unknown_id_is_not_found() {
    let mut tl = Timeline::new(store());
    let err = tl.remove(uuid::Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_entries_serialize_for_any_renderer() {
    let mut tl = Timeline::new(store());
    tl.upload(vec![pdf("ticket.pdf", 64)]).unwrap();
    let json = serde_json::to_value(tl.entries()).unwrap();
    assert_eq!(json[0]["display_name"], "ticket.pdf");
    assert_eq!(json[0]["parsing"], false);
}
