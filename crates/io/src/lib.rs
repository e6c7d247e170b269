// File I/O: workbook reading, registry and dump writers, snapshot JSON

pub mod error;
pub mod json;
pub mod tsv;
pub mod xlsx;

pub use error::IoError;

/// Text encoding of every persisted TSV file (single-byte Western European)
pub const TEXT_ENCODING: &encoding_rs::Encoding = encoding_rs::WINDOWS_1252;
