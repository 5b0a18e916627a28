//! Analyzer abstraction
//!
//! The timeline layer consumes extraction through this trait so tests can
//! substitute a stub for the real service client.

use async_trait::async_trait;

use tripline_core::{FileRef, ParseError, ParsedDocument};

/// One extraction call over a document's content.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, file: &FileRef) -> Result<ParsedDocument, ParseError>;
}
