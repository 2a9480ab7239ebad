use std::path::PathBuf;

use bakeprop_core::properties::PROPERTIES_ENV_VAR;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Bake build properties into generated source as compile-time constants.",
	long_about = "bakeprop reads a list of declarations marked for generation and a string of \
	              `key=value` build properties, then writes one generated source file per \
	              container with every configured value embedded as a literal.\n\nQuick \
	              start:\n  bakeprop info      Show the resolved configuration\n  bakeprop \
	              generate  Write generated files\n  bakeprop check     Verify generated files \
	              are up to date"
)]
pub struct BakepropCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Raw build properties as comma-separated `key=value` pairs. Takes
	/// precedence over `properties` in bakeprop.toml.
	#[arg(long, global = true, env = PROPERTIES_ENV_VAR)]
	pub properties: Option<String>,

	/// Declaration manifest (toml, json or yaml), relative to the project
	/// root.
	#[arg(long, short, global = true)]
	pub declarations: Option<PathBuf>,

	/// Directory generated files are written to, relative to the project
	/// root.
	#[arg(long, short, global = true)]
	pub output: Option<PathBuf>,

	/// Also emit the declaration of the marker attribute.
	#[arg(long, global = true, default_value_t = false)]
	pub emit_marker: bool,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate source files for every valid declaration.
	///
	/// Invalid declarations are reported as warnings and skipped; the rest
	/// are still generated. Use `--deny-warnings` to fail the command when
	/// any declaration was rejected.
	Generate {
		/// Exit with a non-zero status code when any diagnostic is reported.
		#[arg(long, default_value_t = false)]
		deny_warnings: bool,

		/// Show what would be written without touching the output directory.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Output format for diagnostics.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that generated files on disk are up to date.
	///
	/// Exits with a non-zero status code if any file is missing or differs
	/// from what `generate` would write. Ideal for CI pipelines.
	Check {
		/// Show a unified diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Show the resolved configuration, properties and declarations.
	Info {
		/// Output format for info results.
		#[arg(long, value_enum, default_value_t = InfoOutputFormat::Text)]
		format: InfoOutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` annotations that
	/// appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InfoOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
