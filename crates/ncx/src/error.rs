//! CLI error types with miette diagnostics.
//!
//! Only configuration problems end up here. Per-item failures are reported
//! inline by the run and never abort it.

use miette::Diagnostic;
use thiserror::Error;

use ncx_config::ConfigError;
use ncx_core::LoadError;

/// Process exit codes.
pub mod exit_code {
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const INPUT: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input file ───────────────────────────────────────────────────

    #[error("CSV file not found: {path}")]
    #[diagnostic(code(ncx::csv_not_found), help("Check the CSV_PATH argument."))]
    CsvNotFound { path: String },

    #[error("Error reading configuration from CSV")]
    #[diagnostic(
        code(ncx::invalid_csv),
        help(
            "The header row needs ncx_network_id plus one of: id / router_id,\n\
             group_id, or group_name. LAN resources also need site_name;\n\
             resources also need resource."
        )
    )]
    InvalidCsv(#[source] LoadError),

    // ── Configuration ────────────────────────────────────────────────

    #[error("Missing credentials: {}", missing.join(", "))]
    #[diagnostic(
        code(ncx::missing_credentials),
        help(
            "Export X_ECM_API_ID, X_ECM_API_KEY, X_CP_API_ID, X_CP_API_KEY,\n\
             and TOKEN (or NCM_API_TOKEN) before running."
        )
    )]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ncx::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(ncx::config),
        help("Settings are read from the config file (or NCX_CONFIG) and NCX_* variables.")
    )]
    Config(ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CsvNotFound { .. } | Self::InvalidCsv(_) => exit_code::INPUT,
            Self::MissingCredentials { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
        }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::FileNotFound { path } => Self::CsvNotFound {
                path: path.display().to_string(),
            },
            other => Self::InvalidCsv(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCredentials { missing } => Self::MissingCredentials { missing },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
