use clap::Parser;
use intake::commands::{self, Context};
use intake::{error_code, load_catalog, load_settings, print_error, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // INTAKE_LOG wins when set, e.g. INTAKE_LOG=intake::services::evaluator=trace
    let env_filter = if std::env::var("INTAKE_LOG").is_ok() {
        EnvFilter::from_env("INTAKE_LOG")
    } else if cli.verbose {
        EnvFilter::new("intake=debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            print_error(cli.json, error_code(&err), &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;
    let source = cli
        .catalog
        .clone()
        .or_else(|| settings.general.catalog.clone());
    let catalog = load_catalog(source.as_deref(), settings.general.catalog_timeout_ms)?;
    let ctx = Context {
        json: cli.json,
        settings,
        catalog,
    };
    commands::dispatch(cli, &ctx)
}
