use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::DocumentKind;

/// Marker returned in place of fields when an image fails the dimension guard.
pub const TOO_SMALL_MESSAGE: &str = "image too small for OCR";

/// The structured fields recovered from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFields {
    pub name: Option<String>,
    pub identifier_number: Option<String>,
}

impl ParsedFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.identifier_number.is_none()
    }
}

/// What happened to one document slot of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// No image was supplied for this slot.
    NotSubmitted,
    /// The image was undecodable or below the minimum dimensions; OCR was skipped.
    TooSmall,
    /// OCR ran. Fields may still be absent.
    Parsed(ParsedFields),
}

impl DocumentOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            DocumentOutcome::NotSubmitted => "not_submitted",
            DocumentOutcome::TooSmall => "too_small",
            DocumentOutcome::Parsed(_) => "parsed",
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            DocumentOutcome::TooSmall => Some(TOO_SMALL_MESSAGE),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&ParsedFields> {
        match self {
            DocumentOutcome::Parsed(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOutcome::NotSubmitted => write!(f, "not submitted"),
            DocumentOutcome::TooSmall => f.write_str(TOO_SMALL_MESSAGE),
            DocumentOutcome::Parsed(p) => write!(
                f,
                "name={} number={}",
                p.name.as_deref().unwrap_or("-"),
                p.identifier_number.as_deref().unwrap_or("-"),
            ),
        }
    }
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(flatten)]
    fields: Option<&'a ParsedFields>,
}

impl Serialize for DocumentOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeView {
            status: self.status(),
            message: self.message(),
            fields: self.fields(),
        }
        .serialize(serializer)
    }
}

/// Result of processing one request: one outcome per document slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub aadhaar: DocumentOutcome,
    pub pan: DocumentOutcome,
}

impl ScanReport {
    pub fn get(&self, kind: DocumentKind) -> &DocumentOutcome {
        match kind {
            DocumentKind::Aadhaar => &self.aadhaar,
            DocumentKind::Pan => &self.pan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsed_fields_serialize_camel_case() {
        let f = ParsedFields {
            name: Some("RAMESH KUMAR".into()),
            identifier_number: Some("123456789012".into()),
        };
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v, json!({ "name": "RAMESH KUMAR", "identifierNumber": "123456789012" }));
    }

    #[test]
    fn outcomes_are_distinguishable_in_json() {
        let not_submitted = serde_json::to_value(DocumentOutcome::NotSubmitted).unwrap();
        let too_small = serde_json::to_value(DocumentOutcome::TooSmall).unwrap();
        let parsed = serde_json::to_value(DocumentOutcome::Parsed(ParsedFields::default())).unwrap();

        assert_eq!(not_submitted, json!({ "status": "not_submitted" }));
        assert_eq!(
            too_small,
            json!({ "status": "too_small", "message": "image too small for OCR" })
        );
        assert_eq!(
            parsed,
            json!({ "status": "parsed", "name": null, "identifierNumber": null })
        );
    }

    #[test]
    fn too_small_displays_marker() {
        assert_eq!(DocumentOutcome::TooSmall.to_string(), TOO_SMALL_MESSAGE);
        assert_eq!(DocumentOutcome::TooSmall.message(), Some(TOO_SMALL_MESSAGE));
        assert_eq!(DocumentOutcome::NotSubmitted.message(), None);
    }

    #[test]
    fn report_lookup_by_kind() {
        let report = ScanReport {
            aadhaar: DocumentOutcome::TooSmall,
            pan: DocumentOutcome::NotSubmitted,
        };
        assert_eq!(report.get(DocumentKind::Aadhaar), &DocumentOutcome::TooSmall);
        assert_eq!(report.get(DocumentKind::Pan), &DocumentOutcome::NotSubmitted);
    }

    #[test]
    fn empty_fields() {
        assert!(ParsedFields::default().is_empty());
        let f = ParsedFields { name: Some("A B C".into()), identifier_number: None };
        assert!(!f.is_empty());
    }
}
