use serde::{Deserialize, Serialize};
use std::fmt;

/// Which identity document a piece of recognized text came from.
///
/// The kind selects the identifier grammar and the fallback anchor words used
/// by the field extractor. Both kinds share the name filter and the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// 12-digit number printed in three groups of four.
    Aadhaar,
    /// 10-character `AAAAA9999A` account number.
    Pan,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Aadhaar, DocumentKind::Pan];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Aadhaar => "aadhaar",
            DocumentKind::Pan => "pan",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aadhaar" | "aadhar" => Ok(DocumentKind::Aadhaar),
            "pan" => Ok(DocumentKind::Pan),
            other => Err(format!("Unknown document kind: '{other}'")),
        }
    }
}
