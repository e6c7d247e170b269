use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::iban::MAX_IBAN_DIGITS;
use crate::normalize::{NormalizePolicy, SheetMode, WidthPolicy};

/// Rows the published IBAN list is known to exceed; anything shorter is truncated.
pub const LISTAIBAN_MIN_ROWS: usize = 178;

pub const DEFAULT_CODE_WIDTH: usize = 4;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub paths: PathsConfig,
    pub widths: WidthsConfig,
    pub lista: SheetConfig,
    pub nibs: SheetConfig,
    pub dump: DumpConfig,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Known locations, used when the command line passes `.` instead of a path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub listaiban: String,
    pub nibs: String,
    pub snapshot: String,
    /// `$$` is replaced by the country letters.
    pub registry_output: String,
    pub listaiban_output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            listaiban: "bptables/tables-pt/listaiban.xlsx".into(),
            nibs: "eea/tables/pt_NIBS.xlsx".into(),
            snapshot: "iban-pt.json".into(),
            registry_output: "sources/iban-$$.txt".into(),
            listaiban_output: "sources/listaiban.tsv".into(),
        }
    }
}

impl PathsConfig {
    pub fn registry_output_for(&self, country: &str) -> String {
        self.registry_output.replace("$$", country)
    }
}

// ---------------------------------------------------------------------------
// Widths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WidthsConfig {
    #[serde(default = "default_width")]
    pub default: usize,
    #[serde(flatten)]
    pub countries: BTreeMap<String, usize>,
}

fn default_width() -> usize {
    DEFAULT_CODE_WIDTH
}

impl Default for WidthsConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_CODE_WIDTH,
            countries: BTreeMap::from([("pt".to_string(), 4)]),
        }
    }
}

impl WidthsConfig {
    /// Code width for a country, falling back to the default.
    pub fn for_country(&self, country: &str) -> WidthPolicy {
        let digits = self.countries.get(country).copied().unwrap_or(self.default);
        WidthPolicy { digits }
    }
}

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

/// Column positions (0-based) of the canonical fields within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColumnLayout {
    pub code: usize,
    pub display_text: usize,
    pub entity_key: usize,
    #[serde(default)]
    pub entity_type: Option<usize>,
    /// Rows holding a value here are headings, not data.
    #[serde(default)]
    pub marker: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            code: 0,
            display_text: 1,
            entity_key: 2,
            entity_type: Some(3),
            marker: None,
        }
    }
}

impl ColumnLayout {
    /// Number of cells a row needs to populate every mapped field.
    pub fn required_len(&self) -> usize {
        [
            Some(self.code),
            Some(self.display_text),
            Some(self.entity_key),
            self.entity_type,
            self.marker,
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |m| m + 1)
    }
}

/// A sheet table given in TOML replaces the built-in one entirely; unset keys
/// take the generic defaults below, not the built-in sheet's values.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    /// Sheet name; `None` means "named after the country".
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub mode: SheetMode,
    #[serde(default)]
    pub header_rows: usize,
    #[serde(default)]
    pub min_rows: Option<usize>,
    #[serde(default)]
    pub columns: ColumnLayout,
}

impl SheetConfig {
    /// Central-bank "Lista" sheet: code, agent, name, agent type.
    pub fn lista() -> Self {
        Self {
            sheet: Some("Lista".into()),
            mode: SheetMode::Strict,
            header_rows: 1,
            min_rows: Some(LISTAIBAN_MIN_ROWS),
            columns: ColumnLayout {
                code: 0,
                entity_key: 1,
                display_text: 2,
                entity_type: Some(3),
                marker: None,
            },
        }
    }

    /// Per-country NIB sheet: headings in column A, code and name after it.
    pub fn nibs() -> Self {
        Self {
            sheet: None,
            mode: SheetMode::Heterogeneous,
            header_rows: 0,
            min_rows: None,
            columns: ColumnLayout {
                code: 1,
                display_text: 2,
                entity_key: 1,
                entity_type: None,
                marker: Some(0),
            },
        }
    }

    pub fn policy(&self, width: WidthPolicy) -> NormalizePolicy {
        NormalizePolicy {
            width,
            mode: self.mode,
            layout: self.columns,
            header_rows: self.header_rows,
            min_rows: self.min_rows,
        }
    }

    fn validate(&self, name: &str) -> Result<(), RegistryError> {
        if self.columns.code == self.columns.display_text {
            return Err(RegistryError::ConfigValidation(format!(
                "[{name}]: code and display_text share column {}",
                self.columns.code
            )));
        }
        if let Some(marker) = self.columns.marker {
            if marker == self.columns.code || marker == self.columns.display_text {
                return Err(RegistryError::ConfigValidation(format!(
                    "[{name}]: marker column {marker} overlaps a data column"
                )));
            }
        }
        if self.min_rows == Some(0) {
            return Err(RegistryError::ConfigValidation(format!(
                "[{name}]: min_rows must be positive"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Raw dump
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub sheet_index: usize,
    pub columns: usize,
    pub min_rows: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            sheet_index: 1,
            columns: 4,
            min_rows: LISTAIBAN_MIN_ROWS,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            widths: WidthsConfig::default(),
            lista: SheetConfig::lista(),
            nibs: SheetConfig::nibs(),
            dump: DumpConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml(input: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig =
            toml::from_str(input).map_err(|e| RegistryError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        let widths = std::iter::once(("default", self.widths.default))
            .chain(self.widths.countries.iter().map(|(k, v)| (k.as_str(), *v)));
        for (country, width) in widths {
            if width == 0 || width > MAX_IBAN_DIGITS {
                return Err(RegistryError::ConfigValidation(format!(
                    "width for '{country}' must be within 1..={MAX_IBAN_DIGITS}, got {width}"
                )));
            }
        }

        self.lista.validate("lista")?;
        self.nibs.validate("nibs")?;

        if self.dump.sheet_index == 0 {
            return Err(RegistryError::ConfigValidation(
                "[dump]: sheet_index is 1-based".into(),
            ));
        }
        if self.dump.min_rows == 0 || self.dump.columns == 0 {
            return Err(RegistryError::ConfigValidation(
                "[dump]: min_rows and columns must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_builtin() {
        let config = RegistryConfig::from_toml("").unwrap();
        assert_eq!(config.paths.snapshot, "iban-pt.json");
        assert_eq!(config.widths.for_country("pt").digits, 4);
        assert_eq!(config.widths.for_country("zz").digits, 4);
        assert_eq!(config.lista.columns.entity_key, 1);
        assert_eq!(config.nibs.columns.marker, Some(0));
        assert_eq!(config.nibs.mode, SheetMode::Heterogeneous);
        assert_eq!(config.dump.min_rows, LISTAIBAN_MIN_ROWS);
        assert_eq!(config.lista.min_rows, Some(LISTAIBAN_MIN_ROWS));
        assert_eq!(config.nibs.min_rows, None);
    }

    #[test]
    fn parse_overrides() {
        let input = r#"
[paths]
snapshot = "data/iban-pt.json"
registry_output = "out/nib-$$.tsv"

[widths]
default = 5
es = 4

[lista]
sheet = "Lista"
mode = "strict"
header_rows = 2
min_rows = 10

[lista.columns]
code = 0
entity_key = 1
display_text = 2

[dump]
min_rows = 3
"#;
        let config = RegistryConfig::from_toml(input).unwrap();
        assert_eq!(config.paths.snapshot, "data/iban-pt.json");
        assert_eq!(config.paths.registry_output_for("es"), "out/nib-es.tsv");
        // Unset path keys keep their defaults
        assert_eq!(config.paths.nibs, "eea/tables/pt_NIBS.xlsx");
        assert_eq!(config.widths.for_country("es").digits, 4);
        assert_eq!(config.widths.for_country("de").digits, 5);
        assert_eq!(config.lista.header_rows, 2);
        assert_eq!(config.lista.min_rows, Some(10));
        assert_eq!(config.lista.columns.entity_type, None);
        assert_eq!(config.dump.min_rows, 3);
        assert_eq!(config.nibs.columns.code, 1);
    }

    #[test]
    fn reject_zero_width() {
        let err = RegistryConfig::from_toml("[widths]\npt = 0\n").unwrap_err();
        assert!(err.to_string().contains("'pt'"));
    }

    #[test]
    fn reject_overlapping_columns() {
        let input = r#"
[lista.columns]
code = 2
entity_key = 1
display_text = 2
"#;
        let err = RegistryConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("share column 2"));
    }

    #[test]
    fn reject_unknown_mode() {
        let err = RegistryConfig::from_toml("[lista]\nmode = \"lenient\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn required_len_covers_marker() {
        assert_eq!(SheetConfig::nibs().columns.required_len(), 3);
        assert_eq!(ColumnLayout::default().required_len(), 4);
    }
}
