//! `nibtab samples`: IBAN formats with published sample accounts.

use nibtab_registry::iban::{compact_iban, samples_for, split_nib, COUNTRY_FORMATS};

use crate::CliError;

pub fn cmd_samples(country: Option<&str>) -> Result<(), CliError> {
    let formats: Vec<_> = COUNTRY_FORMATS
        .iter()
        .filter(|f| country.map_or(true, |c| f.country.eq_ignore_ascii_case(c)))
        .collect();
    if formats.is_empty() {
        let known: Vec<&str> = COUNTRY_FORMATS.iter().map(|f| f.country).collect();
        return Err(CliError::args(format!(
            "no IBAN format for '{}'",
            country.unwrap_or_default()
        ))
        .with_hint(format!("known countries: {}", known.join(", "))));
    }

    for format in formats {
        println!(
            "{}\t{}\t({} chars)",
            format.country,
            format.format,
            format.compact().len()
        );
        for sample in samples_for(format.country) {
            println!(
                "  {:<8}{}\t{}",
                sample.owner,
                compact_iban(sample.iban),
                split_nib(sample.iban, format.country)
            );
            println!("  {:<8}{}", "", sample.source);
        }
    }
    Ok(())
}
