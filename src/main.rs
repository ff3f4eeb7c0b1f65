//! Sesame - credential resolution for coding-agent sessions.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sesame::cli::output;
use sesame::cli::{execute, Cli};
use sesame::core::constants;
use sesame::error::{ConfigError, CredentialError, Error, ProbeError, SpawnError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sesame=debug")
        } else {
            EnvFilter::new("sesame=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match execute(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let suggestion = match &e {
                Error::Credential(CredentialError::MissingRequired { .. }) => {
                    Some("run: sesame secret add, or export the variable")
                }
                Error::Credential(CredentialError::NotFound { .. }) => Some("run: sesame secret list"),
                Error::Config(ConfigError::UnknownProfile(_)) => Some("run: sesame profile list"),
                Error::Probe(ProbeError::Pending { .. }) => Some("retry once the environment check finishes"),
                Error::Spawn(SpawnError::AgentNotFound(_)) => Some("install the agent CLI or pick another with --agent"),
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}
