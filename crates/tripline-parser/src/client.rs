//! Messages API client
//!
//! Transport for extraction calls against the Anthropic Messages API. One
//! request per call, no automatic retries; a transient failure surfaces
//! once and the caller decides whether to try again.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use tripline_core::{FileRef, ParseError, ParsedDocument, ParserConfig};

use crate::analyzer::DocumentAnalyzer;
use crate::media::{self, ParseRoute, MAX_PARSE_BYTES};
use crate::prompt::{text_request_prompt, EXTRACTION_INSTRUCTION};
use crate::schema;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Extraction client for travel documents.
pub struct DocumentParser {
    http_client: reqwest::Client,
    config: ParserConfig,
    base_url: String,
}

impl Debug for DocumentParser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DocumentParser")
            .field("model", &self.config.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: MediaSource },
    Document { source: MediaSource },
}

#[derive(Debug, Serialize)]
struct MediaSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text { text: String },
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for the extraction service")?;

        Ok(Self {
            http_client,
            config,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Extract a name, document type, and timestamp from a document.
    ///
    /// Unsupported types, oversize content, and missing credentials are
    /// rejected here, before any network activity.
    pub async fn parse(&self, file: &FileRef) -> Result<ParsedDocument, ParseError> {
        let route = media::route_for(file.content_type())
            .ok_or_else(|| ParseError::UnsupportedType(file.content_type().to_string()))?;

        if file.size() > MAX_PARSE_BYTES {
            return Err(ParseError::TooLarge {
                size: file.size(),
                limit: MAX_PARSE_BYTES,
            });
        }

        let api_key = self.credentials()?;

        tracing::info!(
            filename = %file.original_filename(),
            content_type = %file.content_type(),
            file_size = file.size(),
            route = ?route,
            model = %self.config.model,
            "Sending document to extraction service"
        );

        let content = content_blocks(file, route);
        let text = self.send(api_key, content).await?;
        let parsed = schema::validate_payload(&text)?;

        tracing::info!(
            filename = %file.original_filename(),
            document_type = parsed.document_type.as_str(),
            has_timestamp = parsed.timestamp.is_some(),
            "Extraction completed"
        );

        Ok(parsed)
    }

    fn credentials(&self) -> Result<&str, ParseError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != "your-api-key" && key.len() >= 10)
            .ok_or(ParseError::MissingCredentials)
    }

    async fn send(&self, api_key: &str, content: Vec<ContentBlock>) -> Result<String, ParseError> {
        let body = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ParseError::Service(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ParseError::Service(format!(
                "extraction request failed: {status} - {error_text}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ParseError::Service(format!("malformed response: {e}")))?;

        parsed
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlockResponse::Text { text } => text,
            })
            .next()
            .ok_or_else(|| ParseError::Service("response contained no text block".to_string()))
    }
}

#[async_trait]
impl DocumentAnalyzer for DocumentParser {
    async fn analyze(&self, file: &FileRef) -> Result<ParsedDocument, ParseError> {
        self.parse(file).await
    }
}

/// Build the request content for a document on its transport route.
fn content_blocks(file: &FileRef, route: ParseRoute) -> Vec<ContentBlock> {
    match route {
        ParseRoute::Text => {
            let text = String::from_utf8_lossy(file.bytes());
            vec![ContentBlock::Text {
                text: text_request_prompt(&text),
            }]
        }
        ParseRoute::Image => {
            // Trust the magic numbers over the declared type.
            let media_type = media::sniff_image_media_type(file.bytes())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    tripline_core::validation::normalize_mime_type(file.content_type())
                        .to_lowercase()
                });
            vec![
                ContentBlock::Image {
                    source: base64_source(file, &media_type),
                },
                ContentBlock::Text {
                    text: EXTRACTION_INSTRUCTION.to_string(),
                },
            ]
        }
        ParseRoute::Pdf => vec![
            ContentBlock::Document {
                source: base64_source(file, "application/pdf"),
            },
            ContentBlock::Text {
                text: EXTRACTION_INSTRUCTION.to_string(),
            },
        ],
    }
}

fn base64_source(file: &FileRef, media_type: &str) -> MediaSource {
    MediaSource {
        source_type: "base64".to_string(),
        media_type: media_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(file.bytes()),
    }
}
