//! Extraction prompt construction
//!
//! One fixed instruction regardless of transport path: the service answers
//! with a single JSON object in the canonical schema. Text documents are
//! embedded into the prompt, bounded by a character ceiling with an
//! explicit marker when cut.

/// Character ceiling for document text embedded in a prompt.
pub const MAX_DOCUMENT_CHARS: usize = 50_000;

/// Appended whenever embedded text was cut at the ceiling.
pub const TRUNCATION_MARKER: &str = "\n[document content truncated]";

/// Instruction sent with every extraction request. The timestamp clause is
/// part of the contract: only dates stated in the document content count,
/// never file metadata.
pub const EXTRACTION_INSTRUCTION: &str = "\
You are extracting metadata from a travel document (a ticket, booking \
confirmation, passport, or similar). Respond with a single JSON object and \
nothing else, using exactly these fields:
- \"document_name\" (required): a short descriptive name for the document, \
for example \"Flight BER-LIS\" or \"Hotel Mar Azul, Lisbon\".
- \"document_type\" (required): one of \"flight_ticket\", \"train_ticket\", \
\"bus_ticket\", \"hotel_booking\", \"entry_ticket\", \"visa\", \"passport\", \
\"itinerary\", \"other\".
- \"timestamp\" (optional): the main date and time of the document as \
\"YYYY-MM-DDTHH:MM\". Use only dates and times stated in the document \
content itself; never derive this from file metadata. Omit the field when \
the content states no date.
- \"confidence\" (required): one of \"high\", \"medium\", \"low\".
- Optional, only when stated in the document: \"origin\", \"destination\", \
\"place_name\", \"start_date\", \"end_date\", \"traveler_names\" (array of \
strings), \"booking_reference\".";

/// Prompt for the text path: instruction plus the embedded document text.
pub fn text_request_prompt(document_text: &str) -> String {
    let (text, truncated) = truncate_document_text(document_text);
    let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTION.len() + text.len() + 64);
    prompt.push_str(EXTRACTION_INSTRUCTION);
    prompt.push_str("\n\nDocument content:\n---\n");
    prompt.push_str(&text);
    if truncated {
        prompt.push_str(TRUNCATION_MARKER);
    }
    prompt.push_str("\n---");
    prompt
}

/// Bound document text to [`MAX_DOCUMENT_CHARS`], cutting on a character
/// boundary. Returns the bounded text and whether it was cut.
pub fn truncate_document_text(text: &str) -> (String, bool) {
    match text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((byte_index, _)) => (text[..byte_index].to_string(), true),
        None => (text.to_string(), false),
    }
}
