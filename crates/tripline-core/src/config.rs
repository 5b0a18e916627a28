//! Configuration module
//!
//! Environment-driven settings for the parser client and the upload policy.
//! The API credential is read here but only checked at parse time, so a
//! missing key surfaces as a per-parse failure instead of refusing startup.

use std::env;

use crate::validation::{AllowedTypes, UploadPolicy};

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Content types accepted for upload when no override is configured.
const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "text/plain",
    "text/html",
    "text/csv",
];

/// Load a `.env` file into the process environment, if one exists.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

/// Settings for the extraction service client.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Anthropic API key; `None` or empty means parsing is unavailable.
    pub api_key: Option<String>,
    /// Model identifier sent with each request.
    pub model: String,
    /// Response token ceiling.
    pub max_tokens: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ParserConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read parser settings from the environment.
    ///
    /// `ANTHROPIC_API_KEY` is optional here; `TRIPLINE_PARSER_MODEL` and
    /// `TRIPLINE_PARSER_MAX_TOKENS` override the defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model =
            env::var("TRIPLINE_PARSER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = match env::var("TRIPLINE_PARSER_MAX_TOKENS") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("invalid TRIPLINE_PARSER_MAX_TOKENS '{raw}': {e}"))?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };

        Ok(Self {
            api_key,
            model,
            max_tokens,
        })
    }
}

/// Default upload policy: common travel-document types, 50 MB cap.
pub fn default_upload_policy() -> UploadPolicy {
    UploadPolicy::new(
        DEFAULT_MAX_UPLOAD_BYTES,
        AllowedTypes::Only(
            DEFAULT_ALLOWED_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
    )
}

/// Read the upload policy from the environment.
///
/// `TRIPLINE_MAX_UPLOAD_BYTES` overrides the size cap;
/// `TRIPLINE_ALLOWED_TYPES` is a comma-separated MIME list, with `*`
/// meaning accept-all.
pub fn upload_policy_from_env() -> Result<UploadPolicy, anyhow::Error> {
    let mut policy = default_upload_policy();

    if let Ok(raw) = env::var("TRIPLINE_MAX_UPLOAD_BYTES") {
        policy.max_size_bytes = raw
            .parse::<usize>()
            .map_err(|e| anyhow::anyhow!("invalid TRIPLINE_MAX_UPLOAD_BYTES '{raw}': {e}"))?;
    }

    if let Ok(raw) = env::var("TRIPLINE_ALLOWED_TYPES") {
        let raw = raw.trim();
        policy.allowed_types = if raw == "*" {
            AllowedTypes::Any
        } else {
            AllowedTypes::Only(
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            )
        };
    }

    Ok(policy)
}
