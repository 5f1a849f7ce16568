//! # reshelf-quote
//!
//! Command-line front end for the Reshelf decision engine.
//!
//! ## Module Organization
//! ```text
//! reshelf_quote_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── commands.rs     ◄─── price, range, tier, quote, recommend
//! ├── snapshot.rs     ◄─── JSON snapshot files → engine input
//! ├── config.rs       ◄─── quote.toml + RESHELF_* environment
//! └── error.rs        ◄─── CliError / ConfigError
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::QuoteConfig;

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse arguments                                                     │
/// │  2. Load config                                                         │
/// │     • --config given: any failure is fatal                              │
/// │     • default location: failure falls back to defaults (warned below)   │
/// │  3. Initialize logging (RUST_LOG, else log.filter) on stderr            │
/// │  4. Execute the command, print its output on stdout                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = match QuoteConfig::load(cli.config.clone()) {
        Ok(config) => (config, None),
        Err(e) if cli.config.is_none() => (QuoteConfig::default(), Some(e)),
        Err(e) => {
            return Err(e).with_context(|| format!("loading config from {:?}", cli.config))
        }
    };

    init_tracing(&config.log.filter);

    if let Some(e) = load_error {
        warn!("Failed to load quote config: {}. Using defaults.", e);
    }
    debug!(?config, command = ?cli.command, "Starting reshelf-quote");

    let output = commands::execute(&cli.command, &config)?;
    println!("{output}");

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins; otherwise the configured filter applies. Output goes to
/// stderr so stdout stays machine-readable.
fn init_tracing(config_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
