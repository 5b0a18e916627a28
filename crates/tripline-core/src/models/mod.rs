//! Domain models

pub mod document;
pub mod parse;

pub use document::{
    default_scheduled_at, DocumentPatch, DocumentRecord, FileRef, UploadedFile,
};
pub use parse::{Confidence, DocumentKind, ParsedDocument};
