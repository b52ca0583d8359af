//! Clap derive structures for the `ncx` CLI.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use ncx_core::Pipeline;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ncx -- provision NCX exchange sites and resources from CSV files
#[derive(Debug, Parser)]
#[command(
    name = "ncx",
    version,
    about = "Provision NCX exchange sites and resources from CSV files",
    long_about = "Reads a CSV of routers (by id, group id, or group name) and creates\n\
        NCX exchange sites, LAN subnet resources, or generic resources for them.\n\n\
        Credentials are read from X_ECM_API_ID, X_ECM_API_KEY, X_CP_API_ID,\n\
        X_CP_API_KEY, and TOKEN (or NCM_API_TOKEN).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create one exchange site per router
    Sites(CsvArgs),

    /// Create an IP-subnet resource for every LAN of each router
    #[command(alias = "lans")]
    LanResources(CsvArgs),

    /// Create one resource per row (IP, subnet, FQDN, or wildcard FQDN)
    Resources(CsvArgs),
}

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Input CSV with a header row
    #[arg(value_name = "CSV_PATH")]
    pub csv: PathBuf,
}

impl Command {
    pub fn pipeline(&self) -> Pipeline {
        match self {
            Self::Sites(_) => Pipeline::Sites,
            Self::LanResources(_) => Pipeline::LanResources,
            Self::Resources(_) => Pipeline::Resources,
        }
    }

    pub fn csv_path(&self) -> &Path {
        match self {
            Self::Sites(args) | Self::LanResources(args) | Self::Resources(args) => &args.csv,
        }
    }
}
