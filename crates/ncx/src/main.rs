mod cli;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ncx_config::{Credentials, build_clients, load_settings};
use ncx_core::{Provisioner, load_work_items};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{Reporter, should_color};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let pipeline = cli.command.pipeline();

    // Input and credentials are validated before any remote call.
    let config = load_work_items(cli.command.csv_path(), pipeline)?;
    let credentials = Credentials::from_env()?;

    let mut settings = load_settings()?;
    if let Some(timeout) = cli.global.timeout {
        if timeout == 0 {
            return Err(CliError::Validation {
                field: "--timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        settings.timeout_secs = timeout;
    }
    let (ncm, ncx) = build_clients(&settings, &credentials)?;

    tracing::debug!(%pipeline, items = config.items.len(), "dispatching run");
    let mut reporter = Reporter::stdout(should_color(cli.global.color));
    let summary = Provisioner::new(&ncm, &ncx).run(&config, &mut reporter).await;
    reporter.finish(&summary);
    Ok(())
}
