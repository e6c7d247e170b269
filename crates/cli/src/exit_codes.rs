//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success (a skipped write is reported, not an error)        |
//! | 1    | Data error: truncated input, duplicates, failed check gate |
//! | 2    | Usage error (bad args, bad config file)                    |
//! | 3    | I/O error reading an input file                            |

use nibtab_io::IoError;
use nibtab_registry::RegistryError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Data error - the input violates a registry invariant or a check failed.
pub const EXIT_DATA: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid settings.
pub const EXIT_USAGE: u8 = 2;

/// An input file could not be opened or parsed.
pub const EXIT_IO: u8 = 3;

/// Map an engine error to its exit code.
pub fn registry_exit_code(err: &RegistryError) -> u8 {
    match err {
        RegistryError::ConfigParse(_) | RegistryError::ConfigValidation(_) => EXIT_USAGE,
        _ => EXIT_DATA,
    }
}

/// Map an I/O error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::SheetIndex(_) => EXIT_USAGE,
        IoError::Encode { .. } => EXIT_DATA,
        _ => EXIT_IO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_usage() {
        assert_eq!(
            registry_exit_code(&RegistryError::ConfigParse("x".into())),
            EXIT_USAGE
        );
        assert_eq!(
            registry_exit_code(&RegistryError::Uncovered(vec!["A1".into()])),
            EXIT_DATA
        );
    }

    #[test]
    fn sheet_index_zero_is_usage() {
        assert_eq!(io_exit_code(&IoError::SheetIndex(0)), EXIT_USAGE);
    }
}
