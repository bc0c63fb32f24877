//! `nna` - NNA asset registry command line.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use nna_registry::cli::{self, Cli};
use nna_registry::config::{RegistryConfig, init_config};
use nna_registry::{Registry, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(RegistryConfig::load(&cli.config)?);
    let registry = Registry::from_config(&config).context("failed to load the taxonomy")?;

    cli::run(&cli, &registry)
}
