//! nover - pre-flight Node.js version check
//!
//! Typically wired into package.json scripts:
//!
//! ```json
//! "scripts": { "prestart": "nover -t ^18" }
//! ```

use clap::Parser;
use nover::cli::CliArgs;
use nover::config::{Config, LOG_ENV};
use nover::orchestrator::Orchestrator;
use nover::output::{create_reporter, OutputConfig};
use nover::runtime::probe_from_config;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for diagnostics on stderr
///
/// Level is controlled by `NOVER_LOG`; default is warnings only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("nover=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing();

    tracing::debug!("nover starting with args: {:?}", args.args);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
///
/// Check failures are reported on stdout and turned into exit code 1;
/// only unexpected failures (e.g. no working directory) surface as `Err`.
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = Config::from_env()?;
    let reporter = create_reporter(OutputConfig::from_env());
    let mut stdout = io::stdout().lock();

    let probe = probe_from_config(&config);
    let orchestrator = Orchestrator::new(args, config, probe);

    let exit_code = match orchestrator.run(reporter.as_ref(), &mut stdout) {
        Ok(outcome) => {
            let report = &outcome.report;
            tracing::info!(
                "node {} satisfies {} ({}) from {}",
                report.current,
                report.target.raw,
                report.normalized,
                report.target.source
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("check failed: {}", e);
            reporter.report_error(&e, &mut stdout)?;
            ExitCode::FAILURE
        }
    };

    stdout.flush()?;
    Ok(exit_code)
}
