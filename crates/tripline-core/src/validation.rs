//! Upload admission checks
//!
//! A candidate file is admitted by size and declared MIME type before a
//! document record is ever created. The check is a pure predicate over an
//! [`UploadPolicy`]; rejection carries the reason.

use crate::models::UploadedFile;

/// Content types an upload policy accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedTypes {
    /// Accept any content type.
    Any,
    /// Accept only the listed MIME types (compared normalized, no parameters).
    Only(Vec<String>),
}

impl AllowedTypes {
    pub fn permits(&self, content_type: &str) -> bool {
        match self {
            AllowedTypes::Any => true,
            AllowedTypes::Only(types) => {
                let normalized = normalize_mime_type(content_type).to_lowercase();
                types.iter().any(|ct| normalized == ct.to_lowercase())
            }
        }
    }
}

/// Size and content-type limits applied before a file becomes a record.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size_bytes: usize,
    pub allowed_types: AllowedTypes,
}

/// Reasons an upload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file size {size} exceeds maximum allowed size of {max} bytes")]
    SizeExceeded { size: usize, max: usize },

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
}

impl UploadPolicy {
    pub fn new(max_size_bytes: usize, allowed_types: AllowedTypes) -> Self {
        Self {
            max_size_bytes,
            allowed_types,
        }
    }

    /// Accept-all policy bounded only by size.
    pub fn any(max_size_bytes: usize) -> Self {
        Self::new(max_size_bytes, AllowedTypes::Any)
    }

    /// Check a candidate file against this policy. Size is checked first;
    /// an oversize file is rejected regardless of type.
    pub fn admit(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        self.check(file.size(), &file.content_type)
    }

    /// Check raw size and declared content type against this policy.
    pub fn check(&self, size: usize, content_type: &str) -> Result<(), ValidationError> {
        if size > self.max_size_bytes {
            return Err(ValidationError::SizeExceeded {
                size,
                max: self.max_size_bytes,
            });
        }
        if !self.allowed_types.permits(content_type) {
            return Err(ValidationError::UnsupportedType(
                normalize_mime_type(content_type).to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalize a MIME type by stripping parameters
/// (e.g. "image/jpeg; charset=binary" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}
