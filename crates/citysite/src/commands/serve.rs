//! `citysite serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use cs_config::{CliSettings, Config};
use cs_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover citysite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Root domain that state and city subdomains hang off (overrides config).
    #[arg(long, env = "CITYSITE_ROOT_DOMAIN")]
    root_domain: Option<String>,

    /// Directory of loose city records (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Packed city archive (overrides config).
    #[arg(short, long)]
    archive: Option<PathBuf>,

    /// Enable verbose output (request traces and storage warnings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            root_domain: self.root_domain,
            data_dir: self.data_dir,
            archive: self.archive,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;

        output.field(
            "Listening",
            format_args!("{}:{}", config.server.host, config.server.port),
        );
        output.site("Root", &site.root_domain);
        output.field("Archive", site.archive.display());
        output.field("Data", site.data_dir.display());
        if !site.archive.is_file() && !site.data_dir.is_dir() {
            output.warning("no city archive or data directory; every city page will be 404");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
