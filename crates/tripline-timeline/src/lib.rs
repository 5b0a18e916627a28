//! Tripline Timeline
//!
//! Renderer-agnostic view layer over the document store: ordered entries,
//! inline edits, preview materialization, and extraction orchestration with
//! a per-record parsing-in-progress flag. Carries no business rules of its
//! own beyond reflecting store state faithfully.

pub mod timeline;

pub use timeline::{ParseJob, Timeline, TimelineEntry};
