use thiserror::Error;

/// Fatal outcomes of registry extraction and reconciliation.
///
/// Recoverable conditions (a malformed row that may be skipped) are not
/// errors: they surface as [`crate::normalize::RowOutcome::Skip`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required cell is empty in a sheet that does not tolerate gaps.
    #[error("row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },

    /// Rendered code does not fit the configured digit width.
    #[error("mismatched code length (expected: {width}): '{code}'")]
    CodeWidth { code: String, width: usize },

    /// Display text violates the assumed registry shape.
    #[error("row {row}: malformed text '{text}'")]
    MalformedText { row: usize, text: String },

    /// Fewer usable rows than the registry is known to hold.
    #[error("input is too short: {rows} row(s), expected at least {minimum}")]
    TruncatedInput { rows: usize, minimum: usize },

    /// Two distinct entities collapsed onto one code.
    #[error("duplicate code {code}: '{existing}' vs '{incoming}'")]
    DuplicateCode {
        code: String,
        existing: String,
        incoming: String,
    },

    /// Snapshot lists the same entity key twice.
    #[error("duplicate entity key '{key}' (code {code}, '{display_text}')")]
    DuplicateEntityKey {
        key: String,
        code: String,
        display_text: String,
    },

    /// Extracted entry disagrees with the snapshot on code or name.
    #[error(
        "mismatch for '{entity_key}':\nthis code {extracted_code} '{extracted_text}'\nvs:  code {snapshot_code} '{snapshot_text}'{}",
        more_suffix(.more)
    )]
    Mismatch {
        entity_key: String,
        extracted_code: String,
        extracted_text: String,
        snapshot_code: String,
        snapshot_text: String,
        more: usize,
    },

    /// Extracted entries without a snapshot counterpart.
    #[error("missing at snapshot: {}", .0.join(", "))]
    MissingEntries(Vec<String>),

    /// Snapshot entities never reached by any extracted entry.
    #[error("missing entity at extraction: {}", .0.join(", "))]
    Uncovered(Vec<String>),

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error.
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}

fn more_suffix(more: &usize) -> String {
    if *more == 0 {
        String::new()
    } else {
        format!("\n(and {more} more mismatch(es))")
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_sides() {
        let err = RegistryError::Mismatch {
            entity_key: "A1".into(),
            extracted_code: "0002".into(),
            extracted_text: "Bank One".into(),
            snapshot_code: "0001".into(),
            snapshot_text: "Bank One".into(),
            more: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("0002"));
        assert!(msg.contains("0001"));
        assert!(!msg.contains("more"));
    }

    #[test]
    fn mismatch_counts_the_rest() {
        let err = RegistryError::Mismatch {
            entity_key: "A1".into(),
            extracted_code: "0002".into(),
            extracted_text: "x".into(),
            snapshot_code: "0001".into(),
            snapshot_text: "x".into(),
            more: 2,
        };
        assert!(err.to_string().ends_with("(and 2 more mismatch(es))"));
    }
}
