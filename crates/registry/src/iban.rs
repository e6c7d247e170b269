//! IBAN country formats for the registries that are modeled.
//!
//! Format legend: `kk` is the IBAN check digit, `b` bank, `s` branch,
//! `c` account, `x` national check digits.

/// Longest IBAN allowed by the standard.
pub const MAX_IBAN_DIGITS: usize = 34;

#[derive(Debug, Clone, Copy)]
pub struct CountryFormat {
    pub country: &'static str,
    /// General format, grouped as printed on statements.
    pub format: &'static str,
    /// Slices `(a1, a2, a3, a4)` splitting a compact IBAN around its
    /// national check digits: `iban[a1..a2] + "." + iban[a3..a4]`.
    pub check_split: Option<(usize, usize, usize, usize)>,
}

pub const COUNTRY_FORMATS: &[CountryFormat] = &[
    CountryFormat {
        country: "pt",
        format: "PTkk bbbb ssss cccc cccc ccc.xx",
        check_split: Some((0, 25 - 2, 25 - 2, MAX_IBAN_DIGITS)),
    },
    CountryFormat {
        country: "de",
        format: "DEkk bbbb bbbb cccc cccc cc",
        check_split: None,
    },
    CountryFormat {
        country: "es",
        format: "ESkk bbbb ssss xxcc cccc cccc",
        check_split: None,
    },
];

pub fn country_format(country: &str) -> Option<&'static CountryFormat> {
    COUNTRY_FORMATS
        .iter()
        .find(|f| f.country.eq_ignore_ascii_case(country))
}

impl CountryFormat {
    /// Format without grouping spaces or the check-digit dot.
    pub fn compact(&self) -> String {
        self.format.replace([' ', '.'], "")
    }
}

/// IBAN with grouping spaces removed.
pub fn compact_iban(iban: &str) -> String {
    iban.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compact IBAN, with a dot before the national check digits where the
/// country defines them.
pub fn split_nib(iban: &str, country: &str) -> String {
    let iban = compact_iban(iban);
    let split = country_format(country).and_then(|f| f.check_split);
    match split {
        Some((a1, a2, a3, a4)) if iban.is_ascii() && iban.len() >= a3 => {
            let end = a4.min(iban.len());
            format!("{}.{}", &iban[a1..a2], &iban[a3..end])
        }
        _ => iban,
    }
}

/// A published IBAN used as a reference example.
#[derive(Debug, Clone, Copy)]
pub struct SampleIban {
    pub country: &'static str,
    pub owner: &'static str,
    pub iban: &'static str,
    pub source: &'static str,
}

pub const SAMPLES: &[SampleIban] = &[
    SampleIban {
        country: "pt",
        owner: "unicef",
        iban: "PT50 0033 0000 5013 1901 229 05",
        source: "https://www.unicef.pt/como-ajudar/outras-formas-de-fazer-o-seu-donativo/",
    },
    SampleIban {
        country: "de",
        owner: "unicef",
        iban: "DE57 3702 0500 0000 3000 00",
        source: "https://www.unicef.de/informieren/ueber-uns/faq/wie-lautet-die-vollstaendige-bankverbindung-mit-iban-und-bic-von-unicef-deutschland-/27870",
    },
    SampleIban {
        country: "de",
        owner: "wiki",
        iban: "DE91 1000 0000 0123 4567 89",
        source: "https://en.wikipedia.org/wiki/International_Bank_Account_Number",
    },
    SampleIban {
        country: "es",
        owner: "unicef",
        iban: "ES69 2100 5731 77 0200004894",
        source: "https://www.unicef.es/colabora/como-donar",
    },
];

/// Samples of one country, ordered case-insensitively by owner.
pub fn samples_for(country: &str) -> Vec<&'static SampleIban> {
    let mut found: Vec<_> = SAMPLES
        .iter()
        .filter(|s| s.country.eq_ignore_ascii_case(country))
        .collect();
    found.sort_by_key(|s| s.owner.to_lowercase());
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_formats() {
        assert_eq!(
            country_format("pt").unwrap().compact(),
            "PTkkbbbbsssscccccccccccxx"
        );
        assert_eq!(country_format("DE").unwrap().compact().len(), 22);
        assert!(country_format("fr").is_none());
    }

    #[test]
    fn portuguese_check_digits_are_split() {
        assert_eq!(
            split_nib("PT50 0033 0000 5013 1901 229 05", "pt"),
            "PT500033000050131901229.05"
        );
    }

    #[test]
    fn other_countries_stay_compact() {
        assert_eq!(
            split_nib("DE57 3702 0500 0000 3000 00", "de"),
            "DE57370205000000300000"
        );
    }

    #[test]
    fn samples_are_sorted_by_owner() {
        let owners: Vec<&str> = samples_for("de").iter().map(|s| s.owner).collect();
        assert_eq!(owners, vec!["unicef", "wiki"]);
    }
}
