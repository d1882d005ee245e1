//! `rdpshot` -- capture RDP login screen screenshots via the bundled scanner.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use rdpshot_core::config::RdpshotConfig;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = RdpshotConfig::load_or_default(cli.config.as_deref()).await?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    logging::init_tracing(&config.general).map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::debug!(config = ?cli.config, "rdpshot starting");

    let writer = OutputWriter::new(cli.format);
    commands::scan::execute(cli, &config, &writer).await
}

fn report_error(err: &CliError) {
    use colored::Colorize;

    tracing::debug!(error = %err, "rdpshot failed");

    let marker = "[!]".red().bold();
    eprintln!("{} {}", marker, err.headline());
    for hint in err.hints() {
        eprintln!("{} {}", marker, hint);
    }
    if err.is_usage() {
        eprintln!();
        eprintln!("{}", Cli::command().render_help());
    }
}
