//! Tripline Parser Client
//!
//! Client for the external extraction service: sends a document's content
//! to the Anthropic Messages API with a schema-constrained instruction and
//! maps the response, or any failure, into a typed result. Unsupported
//! types, oversize content, and missing credentials are rejected locally
//! before any network activity, and a failed call is never retried here.

pub mod analyzer;
pub mod client;
pub mod media;
pub mod prompt;
pub mod schema;

pub use analyzer::DocumentAnalyzer;
pub use client::DocumentParser;
pub use media::MAX_PARSE_BYTES;
