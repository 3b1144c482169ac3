//! # CLI
//!
//! This module defines the command-line interface of `grls` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring the
//! search term is not empty) before any network activity happens.
use clap::{Args, Parser, Subcommand};
use grls_core::config::ClientAuthMode;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "grls",
    version,
    about = "List the services and methods of a gRPC server through its reflection service"
)]
pub struct Cli {
    /// Address of the gRPC server (e.g. localhost:50051 or https://api.example.com)
    #[arg(
        short,
        long,
        global = true,
        env = "GRLS_ADDRESS",
        default_value = "localhost:50051"
    )]
    pub address: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print the full rpc signature of each method
    #[arg(short = 'l', long = "long", global = true)]
    pub long: bool,

    /// Fail when connecting or a single reflection request takes longer than this (in seconds)
    #[arg(long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Increase logging verbosity (-v, -vv). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub tls: TlsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct TlsArgs {
    /// Use TLS for the server connection
    #[arg(id = "tls", long = "tls", global = true)]
    pub enabled: bool,

    /// Client certificate policy expected by the server
    #[arg(long, global = true, requires = "tls", value_parser = parse_auth_mode)]
    pub tls_auth_type: Option<ClientAuthMode>,

    /// Client certificate file (PEM)
    #[arg(long, global = true, requires = "tls", requires = "key")]
    pub cert: Option<PathBuf>,

    /// Client private key file (PEM)
    #[arg(long, global = true, requires = "tls", requires = "cert")]
    pub key: Option<PathBuf>,

    /// Trusted root certificates file (PEM). Defaults to the webpki roots
    #[arg(long, global = true, requires = "tls")]
    pub ca: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all services exposed by the server
    Ls,

    /// List every method of every service
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// grls -a localhost:50051 lsm --long
    /// ```
    Lsm,

    /// Find the methods whose name contains the given text
    ///
    /// Exits with status 1 when nothing matches.
    #[command(visible_alias = "find_method")]
    FindMethod {
        /// Text to look for in method names (case sensitive)
        #[arg(value_parser = parse_search_term)]
        method: String,
    },
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("Invalid timeout '{value}'. Expected a number of seconds"))?;

    if seconds <= 0.0 {
        return Err("Timeout must be greater than zero".to_string());
    }

    Duration::try_from_secs_f64(seconds).map_err(|e| format!("Invalid timeout '{value}': {e}"))
}

fn parse_auth_mode(value: &str) -> Result<ClientAuthMode, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_search_term(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err("The method to find cannot be empty".to_string());
    }

    Ok(value.to_string())
}
