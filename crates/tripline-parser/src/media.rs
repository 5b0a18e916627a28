//! Content routing for extraction requests
//!
//! Decides how a document travels to the service: plain text embedded in
//! the prompt, a base64 image block, or a base64 PDF document block. Types
//! outside these sets are rejected before any network call.

use tripline_core::validation::normalize_mime_type;

/// Size ceiling for content sent to the extraction service. Independent of
/// the upload policy's cap and checked against the raw byte length, before
/// any base64 expansion.
pub const MAX_PARSE_BYTES: usize = 10 * 1024 * 1024;

const TEXT_TYPES: &[&str] = &["text/plain", "text/html", "text/csv"];
const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const PDF_TYPE: &str = "application/pdf";

/// Transport path for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRoute {
    /// Content goes into the prompt as text.
    Text,
    /// Content goes as a base64 image block.
    Image,
    /// Content goes as a base64 PDF document block.
    Pdf,
}

/// Route for a declared content type, or `None` when the type cannot be
/// parsed at all.
pub fn route_for(content_type: &str) -> Option<ParseRoute> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if TEXT_TYPES.contains(&normalized.as_str()) {
        Some(ParseRoute::Text)
    } else if IMAGE_TYPES.contains(&normalized.as_str()) {
        Some(ParseRoute::Image)
    } else if normalized == PDF_TYPE {
        Some(ParseRoute::Pdf)
    } else {
        None
    }
}

/// Sniff an image's media type from its magic numbers. Returns `None` for
/// unrecognized data; callers fall back to the declared type.
pub fn sniff_image_media_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return Some("image/png");
    }

    // GIF: 47 49 46
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return Some("image/gif");
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12
        && data[0] == 0x52
        && data[1] == 0x49
        && data[2] == 0x46
        && data[3] == 0x46
        && data[8] == 0x57
        && data[9] == 0x45
        && data[10] == 0x42
        && data[11] == 0x50
    {
        return Some("image/webp");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_text_types() {
        assert_eq!(route_for("text/plain"), Some(ParseRoute::Text));
        assert_eq!(route_for("text/csv"), Some(ParseRoute::Text));
    }

    #[test]
    fn test_route_strips_mime_parameters() {
        assert_eq!(
            route_for("text/plain; charset=utf-8"),
            Some(ParseRoute::Text)
        );
    }

    #[test]
    fn test_route_image_and_pdf_types() {
        assert_eq!(route_for("image/png"), Some(ParseRoute::Image));
        assert_eq!(route_for("Application/PDF"), Some(ParseRoute::Pdf));
    }

    #[test]
    fn test_unparseable_types_have_no_route() {
        assert_eq!(route_for("video/mp4"), None);
        assert_eq!(route_for("application/zip"), None);
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(
            sniff_image_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_sniff_png() {
        assert_eq!(
            sniff_image_media_type(&[0x89, 0x50, 0x4E, 0x47]),
            Some("image/png")
        );
    }

    #[test]
    fn test_sniff_webp() {
        let mut data = vec![0x52, 0x49, 0x46, 0x46, 0, 0, 0, 0];
        data.extend_from_slice(&[0x57, 0x45, 0x42, 0x50]);
        assert_eq!(sniff_image_media_type(&data), Some("image/webp"));
    }

    #[test]
    fn test_sniff_unknown_data() {
        assert_eq!(sniff_image_media_type(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(sniff_image_media_type(&[0xFF]), None);
    }
}
