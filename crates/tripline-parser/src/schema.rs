//! Response payload validation
//!
//! The service is instructed to answer with one JSON object; here that text
//! is checked against the schema and turned into a [`ParsedDocument`]. A
//! payload missing a mandatory field, carrying a value outside an
//! enumerated set, or stating an unreadable timestamp is rejected whole.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use tripline_core::{Confidence, DocumentKind, ParseError, ParsedDocument};

/// Timestamp formats accepted from the service, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Deserialize)]
struct WirePayload {
    document_name: String,
    document_type: DocumentKind,
    #[serde(default)]
    timestamp: Option<String>,
    confidence: Confidence,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    traveler_names: Option<Vec<String>>,
    #[serde(default)]
    booking_reference: Option<String>,
}

/// Validate a response text against the extraction schema.
pub fn validate_payload(text: &str) -> Result<ParsedDocument, ParseError> {
    let json_text = extract_json_block(text);

    let wire: WirePayload = serde_json::from_str(json_text)
        .map_err(|e| ParseError::InvalidResponse(e.to_string()))?;

    if wire.document_name.trim().is_empty() {
        return Err(ParseError::InvalidResponse(
            "document_name is empty".to_string(),
        ));
    }

    let timestamp = match wire.timestamp.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
            ParseError::InvalidResponse(format!("unrecognized timestamp '{raw}'"))
        })?),
    };

    Ok(ParsedDocument {
        document_name: wire.document_name.trim().to_string(),
        document_type: wire.document_type,
        timestamp,
        confidence: wire.confidence,
        origin: wire.origin,
        destination: wire.destination,
        place_name: wire.place_name,
        start_date: wire.start_date,
        end_date: wire.end_date,
        traveler_names: wire.traveler_names.unwrap_or_default(),
        booking_reference: wire.booking_reference,
    })
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
pub fn extract_json_block(text: &str) -> &str {
    if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else {
        text.trim()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            // Date without a time sorts at the start of that day.
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
