use std::sync::OnceLock;

use idscan_core::{DocumentKind, NameLines, ParsedFields};
use regex::Regex;

use crate::names::is_likely_name;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_aadhaar_number, r"[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}");
re!(re_pan_number, r"[A-Z]{5}[0-9]{4}[A-Z]");

re!(re_name_label, r"(?i)name");
re!(re_birth_marker, r"(?i)DOB|Year");
re!(re_relation_marker, r"(?i)Father|S/O|D/O|W/O");

// ── Per-kind grammar ──────────────────────────────────────────────────────────

/// How the identifier line is recognised when looking for the name above it.
#[derive(Clone, Copy)]
enum IdentifierLine {
    /// The line's digits, with everything else dropped, equal the identifier.
    DigitsEqual,
    /// The line contains the identifier token verbatim.
    Contains,
}

/// Everything that differs between document kinds.
struct KindGrammar {
    identifier: fn() -> &'static Regex,
    /// Keep only the digits of the match.
    digits_only: bool,
    identifier_line: IdentifierLine,
    /// Last-resort marker; the name is expected on the line after it.
    fallback_anchor: fn() -> &'static Regex,
}

static AADHAAR_GRAMMAR: KindGrammar = KindGrammar {
    identifier: re_aadhaar_number,
    digits_only: true,
    identifier_line: IdentifierLine::DigitsEqual,
    fallback_anchor: re_birth_marker,
};

static PAN_GRAMMAR: KindGrammar = KindGrammar {
    identifier: re_pan_number,
    digits_only: false,
    identifier_line: IdentifierLine::Contains,
    fallback_anchor: re_relation_marker,
};

fn grammar(kind: DocumentKind) -> &'static KindGrammar {
    match kind {
        DocumentKind::Aadhaar => &AADHAAR_GRAMMAR,
        DocumentKind::Pan => &PAN_GRAMMAR,
    }
}

// ── Public extraction API ─────────────────────────────────────────────────────

/// Recovers a name and identifier number from recognized text for one
/// document kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor {
    kind: DocumentKind,
    name_lines: NameLines,
}

impl FieldExtractor {
    pub fn new(kind: DocumentKind) -> Self {
        Self { kind, name_lines: NameLines::default() }
    }

    pub fn with_name_lines(mut self, name_lines: NameLines) -> Self {
        self.name_lines = name_lines;
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Extract structured fields from recognized text.
    pub fn extract(&self, text: &str) -> ParsedFields {
        let grammar = grammar(self.kind);
        let corrected = correct_confusions(text);
        let corrected_lines = split_lines(&corrected);
        let name_lines = match self.name_lines {
            NameLines::Recognized => split_lines(text),
            NameLines::Corrected => corrected_lines.clone(),
        };

        let identifier_number = find_identifier(grammar, &corrected);
        let name = identifier_number
            .as_deref()
            .and_then(|id| above_identifier(grammar, &corrected_lines, &name_lines, id))
            .or_else(|| after_marker(&name_lines, re_name_label()))
            .or_else(|| name_lines.iter().copied().find(|l| is_likely_name(l)))
            .or_else(|| after_marker(&name_lines, (grammar.fallback_anchor)()))
            .map(str::to_string);

        ParsedFields { name, identifier_number }
    }

    /// The name-only step used to score sweep candidates.
    pub fn name(&self, text: &str) -> Option<String> {
        self.extract(text).name
    }
}

/// Shorthand for `FieldExtractor::new(kind).extract(text)`.
pub fn extract(text: &str, kind: DocumentKind) -> ParsedFields {
    FieldExtractor::new(kind).extract(text)
}

/// Undo the commonest OCR glyph swaps in numeric fields: `O`/`o` → `0` and
/// `l`/`I` → `1`. Applied to the whole text, so genuine letters in names get
/// rewritten too.
pub fn correct_confusions(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'l' | 'I' => '1',
            other => other,
        })
        .collect()
}

fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn find_identifier(grammar: &KindGrammar, corrected: &str) -> Option<String> {
    let m = (grammar.identifier)().find(corrected)?;
    if grammar.digits_only {
        Some(digits(m.as_str()))
    } else {
        Some(m.as_str().to_string())
    }
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

// ── Name heuristics ───────────────────────────────────────────────────────────

/// The line directly above the one carrying the identifier.
fn above_identifier<'a>(
    grammar: &KindGrammar,
    corrected_lines: &[&str],
    name_lines: &[&'a str],
    identifier: &str,
) -> Option<&'a str> {
    let idx = corrected_lines.iter().position(|line| match grammar.identifier_line {
        IdentifierLine::DigitsEqual => digits(line) == identifier,
        IdentifierLine::Contains => line.contains(identifier),
    })?;
    let candidate = *name_lines.get(idx.checked_sub(1)?)?;
    is_likely_name(candidate).then_some(candidate)
}

/// The first line following a marker line that passes the name filter.
fn after_marker<'a>(lines: &[&'a str], marker: &Regex) -> Option<&'a str> {
    lines
        .windows(2)
        .find(|pair| marker.is_match(pair[0]) && is_likely_name(pair[1]))
        .map(|pair| pair[1])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
