// Display-text cleanup: transliteration and whitespace normalization.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RegistryError, Result};

/// Closest printable-ASCII form of `text`.
pub fn simplify(text: &str) -> String {
    deunicode::deunicode(text)
}

/// Replace the en-dash (U+2013) with `@` for raw dumps.
pub fn safe_dash(text: &str) -> String {
    text.replace('\u{2013}', "@")
}

fn space_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(" {2,}").expect("static regex"))
}

/// Trim, then collapse every run of spaces down to one.
pub fn collapse_spaces(text: &str) -> String {
    space_runs().replace_all(text.trim(), " ").into_owned()
}

/// Line breaks and tabs become single spaces.
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n', '\t'], " ")
}

/// Full cleanup of one display text taken from sheet row `row`.
///
/// A double newline means the cell holds more than one entity and is fatal.
pub fn normalize_display(text: &str, row: usize) -> Result<String> {
    if text.contains("\n\n") || text.contains("\r\n\r\n") {
        return Err(RegistryError::MalformedText {
            row,
            text: text.replace('\n', "\\n"),
        });
    }
    let cleaned = collapse_spaces(&flatten_newlines(text));
    if cleaned.contains("  ") || cleaned != cleaned.trim() {
        return Err(RegistryError::MalformedText {
            row,
            text: cleaned.replace(' ', "-"),
        });
    }
    Ok(cleaned)
}
