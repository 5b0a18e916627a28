//! Tripline Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! upload validation shared across all Tripline components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{default_upload_policy, load_env, upload_policy_from_env, ParserConfig};
pub use error::{AppError, ParseError};
pub use models::{
    default_scheduled_at, Confidence, DocumentKind, DocumentPatch, DocumentRecord, FileRef,
    ParsedDocument, UploadedFile,
};
pub use validation::{AllowedTypes, UploadPolicy, ValidationError};
