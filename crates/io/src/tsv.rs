// TSV export in the single-byte text encoding
//
// One record per line, tab separated, never quoted, "\n" terminated.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::{info, warn};
use nibtab_registry::dump::DumpLine;

use crate::error::IoError;
use crate::TEXT_ENCODING;

/// Write registry lines (`code`, `text`) in the order given.
///
/// Returns `Ok(false)` when the file cannot be created (permissions, missing
/// directory); the caller reports it and goes on.
pub fn write_registry(path: &Path, lines: &[(&str, &str)]) -> Result<bool, IoError> {
    write_rows(path, lines.iter().map(|(code, text)| vec![*code, *text]))
}

/// Write raw dump lines in sheet order.
pub fn write_dump(path: &Path, lines: &[DumpLine]) -> Result<bool, IoError> {
    write_rows(
        path,
        lines
            .iter()
            .map(|line| line.fields.iter().map(String::as_str).collect::<Vec<_>>()),
    )
}

fn write_rows<'a, I>(path: &Path, rows: I) -> Result<bool, IoError>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let bytes = encode_rows(path, rows)?;

    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::NotFound) => {
            warn!("cannot create {}: {e}", path.display());
            return Ok(false);
        }
        Err(source) => {
            return Err(IoError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    file.write_all(&bytes).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Written: {}", path.display());
    Ok(true)
}

fn encode_rows<'a, I>(path: &Path, rows: I) -> Result<Vec<u8>, IoError>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let write_err = |source: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut out = Vec::new();
    for row in rows {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(&row)
            .map_err(|e| write_err(e.into()))?;
        let line = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;
        let line = String::from_utf8_lossy(&line);

        let (encoded, _, had_errors) = TEXT_ENCODING.encode(&line);
        if had_errors {
            return Err(IoError::Encode {
                path: path.to_path_buf(),
                text: line.trim_end().to_string(),
                encoding: TEXT_ENCODING.name(),
            });
        }
        out.extend_from_slice(&encoded);
    }
    Ok(out)
}
