//! `citysite pack` command implementation.

use std::path::PathBuf;

use clap::Args;
use cs_config::{CliSettings, Config};
use cs_storage::{PackReport, pack_directory};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pack command.
#[derive(Args)]
pub(crate) struct PackArgs {
    /// Path to configuration file (default: auto-discover citysite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of loose city records to pack (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Archive to write (overrides config).
    #[arg(short, long)]
    archive: Option<PathBuf>,
}

impl PackArgs {
    /// Execute the pack command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the archive cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir,
            archive: self.archive,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;

        output.field("Data", site.data_dir.display());
        output.field("Archive", site.archive.display());

        let report = pack_directory(&site.data_dir, &site.archive)?;
        if report.keys.is_empty() {
            output.warning("no city records found; wrote an empty archive");
        }
        output.success(&summary(&report));

        Ok(())
    }
}

/// One-line summary of a finished pack.
fn summary(report: &PackReport) -> String {
    let noun = if report.keys.len() == 1 { "city" } else { "cities" };
    format!(
        "Packed {} {noun} ({} bytes) into {}",
        report.keys.len(),
        report.bytes,
        report.archive.display()
    )
}
