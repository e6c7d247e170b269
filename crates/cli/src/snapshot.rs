//! `nibtab snapshot`: derive the trusted snapshot from reference sheets.

use std::path::{Path, PathBuf};

use nibtab_io::json::write_snapshot;
use nibtab_io::xlsx::{SheetSelector, WorkbookReader};
use nibtab_registry::snapshot::SnapshotBuilder;
use nibtab_registry::RegistryConfig;

use crate::CliError;

pub fn cmd_snapshot(
    config: &RegistryConfig,
    input: &Path,
    sheets: Vec<usize>,
    country: &str,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.paths.snapshot));
    let sheets = if sheets.is_empty() { vec![1] } else { sheets };

    let mut reader = WorkbookReader::open(input)?;
    let mut builder = SnapshotBuilder::new(config.widths.for_country(country));

    for idx in sheets {
        match reader.rows(&SheetSelector::Index(idx))? {
            Some(rows) => builder.add_rows(&rows)?,
            None => println!("Sheet#{} from {}: no such sheet?", idx, input.display()),
        }
    }

    let entries = builder.finish();
    if write_snapshot(&output, &entries)? {
        println!("Written: {} ({} entries)", output.display(), entries.len());
    } else {
        println!("Did not write: {}", output.display());
    }
    Ok(())
}
