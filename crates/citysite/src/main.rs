//! citysite CLI - subdomain landing site engine.
//!
//! Provides commands for:
//! - `serve`: Start the root, state, and city site server
//! - `pack`: Pack loose city records into the read-only archive

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PackArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// citysite - subdomain landing site engine.
#[derive(Parser)]
#[command(name = "citysite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server.
    Serve(ServeArgs),
    /// Pack the city data directory into an archive.
    Pack(PackArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(VERSION))),
        Commands::Pack(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(err);
        std::process::exit(1);
    }
}
