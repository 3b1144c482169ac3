//! Builds the [`SessionConfig`] handed to the core from the parsed command line,
//! loading the TLS files it points to.
use crate::cli::{Cli, TlsArgs};
use anyhow::Context;
use grls_core::config::{PemIdentity, SessionConfig, TlsOptions};
use std::fs;
use std::path::Path;

pub fn session_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = SessionConfig::new(cli.address.clone());

    if cli.tls.enabled {
        config = config.with_tls(tls_options(&cli.tls)?);
    }

    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }

    Ok(config)
}

fn tls_options(args: &TlsArgs) -> anyhow::Result<TlsOptions> {
    let identity = match (&args.cert, &args.key) {
        (Some(cert), Some(key)) => Some(PemIdentity {
            cert: read_pem(cert)?,
            key: read_pem(key)?,
        }),
        (None, None) => None,
        _ => anyhow::bail!("--cert and --key must be used together"),
    };

    let ca_certificate = args.ca.as_deref().map(read_pem).transpose()?;

    let options = TlsOptions::new(
        args.tls_auth_type.unwrap_or_default(),
        identity,
        ca_certificate,
    )?;

    Ok(options)
}

fn read_pem(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
}
