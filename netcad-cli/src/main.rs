//! netcad: network design tooling.
//!
//! # Usage
//!
//! ```text
//! netcad origin sync <model>... [--strict] [--json]
//! netcad origin list [--json]
//! netcad origin show <model> [--json]
//! ```
//!
//! Configuration comes from `~/.netcad/config.yaml` and the `NETCAD_CACHEDIR`,
//! `NETBOX_ADDR`, `NETBOX_TOKEN` and `NETBOX_TIMEOUT` environment variables.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::origin::OriginCommand;

#[derive(Parser, Debug)]
#[command(
    name = "netcad",
    version,
    about = "Network design tooling backed by external sources of record",
    long_about = None,
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and inspect origin records.
    Origin {
        #[command(subcommand)]
        command: OriginCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Origin { command } => commands::origin::run(command),
    }
}

/// Logs go to stderr so table and JSON output on stdout stay clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
