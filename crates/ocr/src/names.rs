/// Card labels and authority names that look like names to the character
/// test but never are. Compared case-insensitively against the whole line.
const LABEL_DENYLIST: &[&str] = &[
    "MALE",
    "FEMALE",
    "DOB",
    "YEAR",
    "GOVERNMENT",
    "INDIA",
    "AADHAAR",
    "UNIQUE IDENTIFICATION AUTHORITY",
    "INCOME TAX DEPARTMENT",
    "PERMANENT ACCOUNT NUMBER",
    "GOVT",
];

/// Whether a recognized line plausibly holds a person's name: at least three
/// characters, ASCII letters and spaces only, and not a known card label.
pub fn is_likely_name(line: &str) -> bool {
    line.len() >= 3
        && line.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
        && !LABEL_DENYLIST.iter().any(|label| line.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(is_likely_name("RAMESH KUMAR"));
        assert!(is_likely_name("Sunita Sharma"));
        assert!(is_likely_name("Ali"));
    }

    #[test]
    fn rejects_short_lines() {
        assert!(!is_likely_name(""));
        assert!(!is_likely_name("AB"));
        // Length counts spaces, so this passes the length rule.
        assert!(is_likely_name("A B"));
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        assert!(!is_likely_name("SUN1TA SHARMA"));
        assert!(!is_likely_name("DOB 01-01-1990"));
        assert!(!is_likely_name("S/O RAJ"));
        assert!(!is_likely_name("O'BRIEN"));
    }

    #[test]
    fn rejects_non_ascii_letters() {
        assert!(!is_likely_name("JOSÉ"));
    }

    #[test]
    fn government_is_never_a_name() {
        assert!(!is_likely_name("GOVERNMENT"));
        assert!(!is_likely_name("government"));
        assert!(!is_likely_name("Government"));
    }

    #[test]
    fn rejects_every_label_in_any_case() {
        for label in LABEL_DENYLIST {
            assert!(!is_likely_name(label), "{label}");
            assert!(!is_likely_name(&label.to_lowercase()), "{label}");
        }
        assert!(!is_likely_name("Permanent Account Number"));
    }

    #[test]
    fn label_must_match_whole_line() {
        assert!(is_likely_name("GOVERNMENT OF INDIA"));
        assert!(is_likely_name("MALENA"));
    }

    #[test]
    fn verdict_is_stable() {
        for line in ["RAMESH KUMAR", "GOVT", "12 AB"] {
            assert_eq!(is_likely_name(line), is_likely_name(line));
        }
    }
}
