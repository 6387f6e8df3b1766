//! Verdant command-line driver.
//!
//! Loads a level with an optional builtin catalog and level configuration,
//! then checks, formats, resolves, or prunes it.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = commands::load_config(cli.config.as_deref())?;
	let catalog = verdant_catalog::install(commands::load_catalog(cli.catalog.as_deref())?).context("failed to publish catalog")?;

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	match &cli.command {
		Command::Check { level, json } => {
			if commands::check(level, *json, catalog, &config, &mut out)? {
				return Ok(ExitCode::FAILURE);
			}
		}
		Command::Fmt { level, write } => commands::fmt(level, *write, &config, &mut out)?,
		Command::Resolve { level, reference } => commands::resolve(level, reference, catalog, &config, &mut out)?,
		Command::Prune { level, holder, pointer } => commands::prune(level, holder, pointer, &config, &mut out)?,
	}
	Ok(ExitCode::SUCCESS)
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("verdant=debug,verdant_level=debug,verdant_catalog=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
