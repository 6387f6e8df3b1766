use std::path::PathBuf;

use clap::{Parser, Subcommand};


#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(about = "Check, format, and repair level files")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Builtin catalog data (TOML)
	#[arg(long, value_name = "FILE", global = true)]
	pub catalog: Option<PathBuf>,

	/// Level configuration (TOML)
	#[arg(long, value_name = "FILE", global = true)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Report duplicate aliases and broken or malformed references
	Check {
		level: PathBuf,
		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},
	/// Rewrite a level in canonical object order
	Fmt {
		level: PathBuf,
		/// Overwrite the file instead of printing
		#[arg(short, long)]
		write: bool,
	},
	/// Show what a reference resolves to
	Resolve {
		level: PathBuf,
		/// Reference literal, e.g. RTID(Wave1@CurrentLevel)
		reference: String,
	},
	/// Delete one reference field from an object, in place
	Prune {
		level: PathBuf,
		/// Alias of the object holding the reference
		holder: String,
		/// JSON pointer to the field, e.g. /Modules/2
		pointer: String,
	},
}
