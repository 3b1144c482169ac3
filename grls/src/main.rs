//! # Grls CLI Entry Point
//!
//! The main executable for the Grls tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and sets up logging.
//! 2. **Configuration**: Builds the session configuration, loading TLS files if needed.
//! 3. **Execution**: Connects through `grls_core` and runs the requested command.
//! 4. **Presentation**: Prints the result as text or JSON, or a diagnostic on standard error.
//!
//! Exit status is `0` on success, `1` when `find-method` matches nothing and `2` on any error.
mod cli;
mod config;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands};
use formatter::{FormattedString, MethodList, OutputFormat, ServiceList, render};
use grls_core::client::Introspector;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

enum Outcome {
    Success,
    NoMatches,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::NoMatches) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: Cli) -> Result<Outcome, FormattedString> {
    let config = config::session_config(&args)?;
    let format = OutputFormat::from_json_flag(args.json);

    if let Some(tls) = &config.tls {
        tracing::debug!(
            auth_mode = %tls.auth_mode(),
            client_identity = tls.has_identity(),
            "TLS enabled"
        );
    }

    tracing::info!(address = %config.uri(), "Connecting to reflection service");
    let mut client = Introspector::connect(&config).await?;

    match args.command {
        Commands::Ls => {
            let services = client.list_services().await?;
            tracing::info!(count = services.len(), "Listed services");

            println!("{}", render(&ServiceList(services), format)?);
            Ok(Outcome::Success)
        }
        Commands::Lsm => {
            let methods = client.list_methods(args.long).await?;
            tracing::info!(count = methods.len(), "Listed methods");

            println!("{}", render(&MethodList(methods), format)?);
            Ok(Outcome::Success)
        }
        Commands::FindMethod { method } => {
            let found = client.find_methods(&method, args.long).await?;
            tracing::info!(needle = %method, count = found.len(), "Searched methods");

            if found.is_empty() {
                return Ok(Outcome::NoMatches);
            }

            println!("{}", render(&MethodList(found), format)?);
            Ok(Outcome::Success)
        }
    }
}

/// Logs go to standard error so they never mix with the command output.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
