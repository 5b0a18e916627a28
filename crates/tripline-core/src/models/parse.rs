use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Document category tags the extraction service may assign.
///
/// The wire format is snake_case; any value outside this set fails
/// deserialization and the whole payload is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    FlightTicket,
    TrainTicket,
    BusTicket,
    HotelBooking,
    EntryTicket,
    Visa,
    Passport,
    Itinerary,
    #[default]
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::FlightTicket => "flight_ticket",
            DocumentKind::TrainTicket => "train_ticket",
            DocumentKind::BusTicket => "bus_ticket",
            DocumentKind::HotelBooking => "hotel_booking",
            DocumentKind::EntryTicket => "entry_ticket",
            DocumentKind::Visa => "visa",
            DocumentKind::Passport => "passport",
            DocumentKind::Itinerary => "itinerary",
            DocumentKind::Other => "other",
        }
    }
}

/// Service self-assessment of extraction quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

/// Validated result of one extraction call.
///
/// `document_name`, `document_type`, and `confidence` are mandatory in the
/// service response; `timestamp` is present only when the document content
/// states a date. The remaining fields are enrichment the service may or
/// may not fill, and nothing downstream depends on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub document_name: String,
    pub document_type: DocumentKind,
    pub timestamp: Option<NaiveDateTime>,
    pub confidence: Confidence,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub place_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub traveler_names: Vec<String>,
    pub booking_reference: Option<String>,
}
