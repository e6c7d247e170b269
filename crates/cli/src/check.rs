//! `nibtab check`: strict extraction reconciled against the snapshot.

use std::path::PathBuf;

use nibtab_io::json::read_snapshot;
use nibtab_io::xlsx::{read_sheet, SheetSelector};
use nibtab_registry::{extract, reconcile, DualIndex, ReconciliationReport, RegistryConfig};

use crate::{resolve_input, CliError};

pub fn cmd_check(
    config: &RegistryConfig,
    input: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    sheet: Option<String>,
    country: &str,
    json: bool,
) -> Result<(), CliError> {
    let input = resolve_input(input, &config.paths.listaiban);
    let snapshot = snapshot.unwrap_or_else(|| PathBuf::from(&config.paths.snapshot));

    let entries = read_snapshot(&snapshot)?;
    let index = DualIndex::build(&entries)?;

    let selector = match sheet.or_else(|| config.lista.sheet.clone()) {
        Some(name) => SheetSelector::Name(name),
        None => SheetSelector::Index(1),
    };
    let rows = read_sheet(&input, &selector)?.ok_or_else(|| {
        CliError::io(format!("{}: no sheet {}", input.display(), selector))
            .with_hint("pass --sheet with the list sheet name")
    })?;

    let policy = config.lista.policy(config.widths.for_country(country));
    let extraction = extract(&rows, &policy)?;
    let report = reconcile(&extraction.records, &index);

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::data(format!("cannot serialize report: {e}")))?;
        println!("{out}");
    }
    eprintln!("{}", summary(&report));

    report.verdict()?;
    Ok(())
}

fn summary(report: &ReconciliationReport) -> String {
    format!(
        "{} extracted, {} snapshot entities: {} matched, {} mismatched, {} missing, {} uncovered",
        report.meta.extracted,
        report.meta.snapshot_entities,
        report.matched,
        report.mismatched.len(),
        report.missing.len(),
        report.uncovered.len(),
    )
}
