//! `nibtab listaiban`: raw dump of the published IBAN list.

use std::path::PathBuf;

use log::debug;
use nibtab_io::tsv::write_dump;
use nibtab_io::xlsx::{read_sheet, SheetSelector};
use nibtab_registry::dump::{dump_rows, DumpPolicy};
use nibtab_registry::RegistryConfig;

use crate::{resolve_input, CliError};

pub fn cmd_listaiban(
    config: &RegistryConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let input = resolve_input(input, &config.paths.listaiban);
    let output = output.unwrap_or_else(|| PathBuf::from(&config.paths.listaiban_output));
    let selector = SheetSelector::Index(config.dump.sheet_index);

    let rows = read_sheet(&input, &selector)?
        .ok_or_else(|| CliError::io(format!("{}: no sheet {}", input.display(), selector)))?;

    let policy = DumpPolicy {
        columns: config.dump.columns,
        min_rows: config.dump.min_rows,
    };
    let lines = dump_rows(&rows, &policy)?;
    for line in &lines {
        debug!("{}: {}", line.row, line.fields.join(" | "));
    }

    if write_dump(&output, &lines)? {
        println!("# Written: {} ({} lines)", output.display(), lines.len());
    } else {
        println!("# Did not write: {}", output.display());
    }
    Ok(())
}
