//! `nibtab nibs`: country NIB sheet to the persisted code registry.

use std::path::PathBuf;

use log::{info, warn};
use nibtab_io::tsv::write_registry;
use nibtab_io::xlsx::{read_sheet, SheetSelector};
use nibtab_registry::{extract, Registry, RegistryConfig};

use crate::{resolve_input, CliError};

pub fn cmd_nibs(
    config: &RegistryConfig,
    input: Option<PathBuf>,
    country: &str,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let input = resolve_input(input, &config.paths.nibs);
    let output = output.unwrap_or_else(|| PathBuf::from(config.paths.registry_output_for(country)));
    let sheet = config.nibs.sheet.clone().unwrap_or_else(|| country.to_string());
    let width = config.widths.for_country(country);

    let rows = read_sheet(&input, &SheetSelector::Name(sheet.clone()))?.ok_or_else(|| {
        CliError::io(format!("{}: no sheet '{}'", input.display(), sheet))
            .with_hint("pass --country matching a sheet name")
    })?;

    let extraction = extract(&rows, &config.nibs.policy(width))?;
    for (row, reason) in &extraction.skipped {
        info!("row {row}: {reason}");
    }
    if extraction.records.is_empty() {
        return Err(CliError::data(format!(
            "{}: no codes found in sheet '{}'",
            input.display(),
            sheet
        )));
    }

    let registry = Registry::with_reserved(width)?.extend(&extraction.records)?;
    let lines = registry.persisted(width)?;
    for (code, text) in &lines {
        println!("{code}\t{text}");
    }

    if write_registry(&output, &lines)? {
        println!("# Written: {}", output.display());
    } else {
        warn!("{}: skipped", output.display());
        println!("# Did not write: {}", output.display());
    }
    Ok(())
}
