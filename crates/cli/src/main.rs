// nibtab CLI - bank-code registry extraction, snapshots and checks

mod check;
mod exit_codes;
mod listaiban;
mod nibs;
mod samples;
mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use nibtab_io::IoError;
use nibtab_registry::{RegistryConfig, RegistryError};

use exit_codes::{io_exit_code, registry_exit_code, EXIT_DATA, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

/// Country used when none is given.
const DEFAULT_COUNTRY: &str = "pt";

#[derive(Parser)]
#[command(name = "nibtab")]
#[command(about = "Build and check bank-code registries from central-bank workbooks")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// More output: -v info, -vv debug, -vvv trace (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (TOML); built-in defaults apply without it
    #[arg(long, global = true, env = "NIBTAB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a country NIB sheet into the persisted code registry
    #[command(after_help = "\
Examples:
  nibtab nibs .
  nibtab nibs eea/tables/pt_NIBS.xlsx --country pt
  nibtab nibs book.xlsx -o /tmp/iban-pt.txt")]
    Nibs {
        /// Workbook path, or '.' for the configured default
        input: Option<PathBuf>,

        /// Country code; also the sheet name unless settings say otherwise
        #[arg(long, default_value = DEFAULT_COUNTRY)]
        country: String,

        /// Output file (default: configured registry output)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Derive the trusted snapshot from reference sheets
    #[command(after_help = "\
Examples:
  nibtab snapshot listaiban.xlsx
  nibtab snapshot listaiban.xlsx 2 3 -o iban-pt.json")]
    Snapshot {
        /// Workbook path
        input: PathBuf,

        /// 1-based sheet positions to read (default: 1)
        sheets: Vec<usize>,

        /// Country code (selects the code width)
        #[arg(long, default_value = DEFAULT_COUNTRY)]
        country: String,

        /// Output file (default: configured snapshot path)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Dump the published IBAN list as tab-separated text
    #[command(after_help = "\
Examples:
  nibtab listaiban .
  nibtab -v listaiban bptables/tables-pt/listaiban.xlsx")]
    Listaiban {
        /// Workbook path, or '.' for the configured default
        input: Option<PathBuf>,

        /// Output file (default: configured dump output)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Reconcile a fresh extraction against the trusted snapshot
    #[command(after_help = "\
Examples:
  nibtab check .
  nibtab check listaiban.xlsx --snapshot iban-pt.json --json")]
    Check {
        /// Workbook path, or '.' for the configured default
        input: Option<PathBuf>,

        /// Snapshot JSON (default: configured snapshot path)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Sheet name (default: configured list sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Country code (selects the code width)
        #[arg(long, default_value = DEFAULT_COUNTRY)]
        country: String,

        /// Print the full report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show IBAN formats and published sample accounts
    Samples {
        /// Only this country
        #[arg(long)]
        country: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Nibs { input, country, output } => nibs::cmd_nibs(&config, input, &country, output),
        Commands::Snapshot { input, sheets, country, output } => {
            snapshot::cmd_snapshot(&config, &input, sheets, &country, output)
        }
        Commands::Listaiban { input, output } => listaiban::cmd_listaiban(&config, input, output),
        Commands::Check { input, snapshot, sheet, country, json } => {
            check::cmd_check(&config, input, snapshot, sheet, &country, json)
        }
        Commands::Samples { country } => samples::cmd_samples(country.as_deref()),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RegistryConfig, CliError> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", path.display(), e)))?;
    RegistryConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("fix {} or drop --config", path.display())))
}

/// `None` or `.` selects the configured default path.
fn resolve_input(input: Option<PathBuf>, default: &str) -> PathBuf {
    match input {
        Some(path) if path != Path::new(".") => path,
        _ => PathBuf::from(default),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self { code: EXIT_DATA, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        let hint = match &err {
            RegistryError::TruncatedInput { .. } => {
                Some("the workbook may be an older or partial release".to_string())
            }
            RegistryError::Uncovered(_) | RegistryError::MissingEntries(_) => {
                Some("regenerate the snapshot with `nibtab snapshot` if the list changed".to_string())
            }
            _ => None,
        };
        Self { code: registry_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match &err {
            IoError::SheetIndex(_) => Some("sheet positions start at 1".to_string()),
            _ => None,
        };
        Self { code: io_exit_code(&err), message: err.to_string(), hint }
    }
}
