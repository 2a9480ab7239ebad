use std::path::Path;
use std::path::PathBuf;
use std::process;

use bakeprop_cli::BakepropCli;
use bakeprop_cli::Commands;
use bakeprop_cli::InfoOutputFormat;
use bakeprop_cli::OutputFormat;
use bakeprop_core::AnyResult;
use bakeprop_core::BakeError;
use bakeprop_core::CancellationToken;
use bakeprop_core::DeclarationSource;
use bakeprop_core::Diagnostic;
use bakeprop_core::DiagnosticKind;
use bakeprop_core::GenerateOptions;
use bakeprop_core::GeneratedUnit;
use bakeprop_core::GenerationOutput;
use bakeprop_core::Generator;
use bakeprop_core::PropertyMap;
use bakeprop_core::Severity;
use bakeprop_core::config::BakeConfig;
use bakeprop_core::emit::GENERATED_FILE_SUFFIX;
use bakeprop_core::manifest::DeclarationManifest;
use bakeprop_core::properties::resolve;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a tracing filter directive.
const LOG_ENV_VAR: &str = "BAKEPROP_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = BakepropCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match args.command {
		Some(Commands::Generate {
			deny_warnings,
			dry_run,
			format,
		}) => run_generate(&args, deny_warnings, dry_run, format),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::Info { format }) => run_info(&args, format),
		None => {
			eprintln!("No subcommand specified. Run `bakeprop --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			match e.downcast::<BakeError>() {
				Ok(bake_err) => {
					let report: miette::Report = (*bake_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"bakeprop_core=debug,bakeprop=debug"
	} else {
		"warn"
	};
	let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
		.unwrap_or_else(|_| EnvFilter::new(default_directive));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init();
}

/// Everything a command needs, resolved from flags, the environment and
/// bakeprop.toml.
struct Project {
	root: PathBuf,
	config_path: Option<PathBuf>,
	raw_properties: Option<String>,
	manifest: DeclarationManifest,
	output_dir: PathBuf,
	options: GenerateOptions,
}

fn resolve_root(args: &BakepropCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_project(args: &BakepropCli) -> AnyResult<Project> {
	let root = resolve_root(args);
	let config_path = BakeConfig::resolve_path(&root);
	let config = BakeConfig::load(&root)?.unwrap_or_default();

	let raw_properties = args.properties.clone().or_else(|| config.properties.clone());
	let manifest_path = args
		.declarations
		.clone()
		.or_else(|| config.declarations.clone())
		.ok_or(BakeError::MissingManifest)?;
	let manifest = DeclarationManifest::load(&root.join(manifest_path))?;

	let output_dir = match &args.output {
		Some(output) => root.join(output),
		None => config.output_dir(&root),
	};

	let mut options = config.generate_options();
	options.emit_marker_attribute |= args.emit_marker;

	tracing::debug!(
		root = %root.display(),
		output = %output_dir.display(),
		candidates = manifest.len(),
		"loaded project"
	);

	Ok(Project {
		root,
		config_path,
		raw_properties,
		manifest,
		output_dir,
		options,
	})
}

fn run_pass(project: &Project) -> AnyResult<GenerationOutput> {
	let generator = Generator::new(project.options.clone());
	let output = generator.generate(
		project.raw_properties.as_deref(),
		&project.manifest,
		&CancellationToken::new(),
	)?;

	Ok(output)
}

fn run_generate(
	args: &BakepropCli,
	deny_warnings: bool,
	dry_run: bool,
	format: OutputFormat,
) -> AnyResult<bool> {
	let project = load_project(args)?;
	let output = run_pass(&project)?;
	let orphans = find_orphans(&project.output_dir, &output.units)?;

	if !dry_run {
		std::fs::create_dir_all(&project.output_dir)?;
		for unit in &output.units {
			std::fs::write(project.output_dir.join(&unit.filename), &unit.text)?;
		}
		for orphan in &orphans {
			std::fs::remove_file(orphan)?;
			tracing::debug!(path = %orphan.display(), "removed leftover generated file");
		}
	}

	match format {
		OutputFormat::Json => {
			let report = GenerateReport {
				ok: !(deny_warnings && output.has_diagnostics()),
				dry_run,
				units: output
					.units
					.iter()
					.map(|unit| {
						UnitReport {
							file: make_relative(&project.output_dir.join(&unit.filename), &project.root),
							bytes: unit.text.len(),
						}
					})
					.collect(),
				removed: orphans
					.iter()
					.map(|orphan| make_relative(orphan, &project.root))
					.collect(),
				diagnostics: diagnostic_reports(&output.diagnostics, &project.root),
			};
			println!("{}", serde_json::to_string(&report)?);
		}
		OutputFormat::Github => {
			print_github_annotations(&output.diagnostics, &project.root);
			eprintln!("{}", generate_summary(&output, dry_run));
		}
		OutputFormat::Text => {
			print_diagnostics(&output.diagnostics, &project.root, deny_warnings);
			let (write_verb, remove_verb) = if dry_run {
				("Would write", "Would remove")
			} else {
				("Wrote", "Removed")
			};
			for unit in &output.units {
				let rel = make_relative(&project.output_dir.join(&unit.filename), &project.root);
				println!("  {write_verb} {rel}");
			}
			for orphan in &orphans {
				println!("  {remove_verb} {}", make_relative(orphan, &project.root));
			}
			println!("{}", generate_summary(&output, dry_run));
		}
	}

	Ok(!(deny_warnings && output.has_diagnostics()))
}

fn generate_summary(output: &GenerationOutput, dry_run: bool) -> String {
	let verb = if dry_run { "Would generate" } else { "Generated" };
	let summary = format!(
		"{verb} {} file(s) with {} diagnostic(s).",
		output.units.len(),
		output.diagnostics.len()
	);

	if output.has_diagnostics() {
		colored!(summary, yellow)
	} else {
		colored!(summary, green)
	}
}

#[derive(Serialize)]
struct GenerateReport<'a> {
	ok: bool,
	dry_run: bool,
	units: Vec<UnitReport>,
	removed: Vec<String>,
	diagnostics: Vec<DiagnosticReport<'a>>,
}

#[derive(Serialize)]
struct UnitReport {
	file: String,
	bytes: usize,
}

#[derive(Serialize)]
struct CheckReport<'a> {
	ok: bool,
	stale: Vec<StaleReport>,
	orphaned: Vec<String>,
	diagnostics: Vec<DiagnosticReport<'a>>,
}

#[derive(Serialize)]
struct StaleReport {
	file: String,
	missing: bool,
}

#[derive(Serialize)]
struct InfoReport<'a> {
	root: String,
	config: Option<String>,
	declarations: String,
	output: String,
	emit_marker_attribute: bool,
	properties: &'a PropertyMap,
	candidates: usize,
}

/// One diagnostic in `--format json` output. Paths are relative to the
/// project root.
#[derive(Serialize)]
struct DiagnosticReport<'a> {
	code: &'static str,
	severity: Severity,
	message: String,
	arguments: &'a [String],
	file: Option<String>,
	line: Option<usize>,
	column: Option<usize>,
}

/// A generated unit whose file on disk is missing or different.
struct StaleUnit<'a> {
	unit: &'a GeneratedUnit,
	path: PathBuf,
	current: Option<String>,
}

fn run_check(
	args: &BakepropCli,
	show_diff: bool,
	format: OutputFormat,
) -> AnyResult<bool> {
	let project = load_project(args)?;
	let output = run_pass(&project)?;

	let mut stale = Vec::new();
	for unit in &output.units {
		let path = project.output_dir.join(&unit.filename);
		let current = std::fs::read_to_string(&path).ok();
		if current.as_deref() != Some(unit.text.as_str()) {
			stale.push(StaleUnit {
				unit,
				path,
				current,
			});
		}
	}
	let orphans = find_orphans(&project.output_dir, &output.units)?;
	let ok = stale.is_empty() && orphans.is_empty();

	match format {
		OutputFormat::Json => {
			let report = CheckReport {
				ok,
				stale: stale
					.iter()
					.map(|entry| {
						StaleReport {
							file: make_relative(&entry.path, &project.root),
							missing: entry.current.is_none(),
						}
					})
					.collect(),
				orphaned: orphans
					.iter()
					.map(|orphan| make_relative(orphan, &project.root))
					.collect(),
				diagnostics: diagnostic_reports(&output.diagnostics, &project.root),
			};
			println!("{}", serde_json::to_string(&report)?);
		}
		OutputFormat::Github => {
			print_github_annotations(&output.diagnostics, &project.root);
			for entry in &stale {
				let rel = make_relative(&entry.path, &project.root);
				println!("::error file={rel}::Generated file is out of date. Run `bakeprop generate`.");
			}
			for orphan in &orphans {
				let rel = make_relative(orphan, &project.root);
				println!(
					"::error file={rel}::Generated file has no matching declarations. Run `bakeprop \
					 generate`."
				);
			}
		}
		OutputFormat::Text => {
			print_diagnostics(&output.diagnostics, &project.root, false);

			if ok {
				println!("Check passed: all generated files are up to date.");
				return Ok(true);
			}

			eprintln!("Check failed.");
			eprintln!("  stale files: {}", stale.len());
			if !orphans.is_empty() {
				eprintln!("  orphaned files: {}", orphans.len());
			}
			eprintln!();
			for orphan in &orphans {
				eprintln!(
					"  {} {}",
					colored!("orphaned", red),
					make_relative(orphan, &project.root)
				);
			}
			for entry in &stale {
				let rel = make_relative(&entry.path, &project.root);
				match &entry.current {
					Some(current) => {
						eprintln!("  {} {rel}", colored!("stale", yellow));
						if show_diff {
							print_diff(current, &entry.unit.text);
						}
					}
					None => eprintln!("  {} {rel}", colored!("missing", red)),
				}
			}
			eprintln!();
			eprintln!("Run `bakeprop generate` to update them.");
		}
	}

	Ok(ok)
}

/// Files in `output_dir` carrying the generated suffix that this run did
/// not produce, sorted by path.
fn find_orphans(output_dir: &Path, units: &[GeneratedUnit]) -> AnyResult<Vec<PathBuf>> {
	if !output_dir.is_dir() {
		return Ok(Vec::new());
	}

	let mut orphans = Vec::new();
	for entry in std::fs::read_dir(output_dir)? {
		let path = entry?.path();
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			continue;
		};

		if path.is_file()
			&& name.ends_with(GENERATED_FILE_SUFFIX)
			&& !units.iter().any(|unit| unit.filename == name)
		{
			orphans.push(path);
		}
	}
	orphans.sort();

	Ok(orphans)
}

fn run_info(args: &BakepropCli, format: InfoOutputFormat) -> AnyResult<bool> {
	let project = load_project(args)?;
	let properties = resolve(project.raw_properties.as_deref());
	let candidates = project.manifest.candidates();

	match format {
		InfoOutputFormat::Json => {
			let report = InfoReport {
				root: project.root.display().to_string(),
				config: project
					.config_path
					.as_ref()
					.map(|path| path.display().to_string()),
				declarations: project.manifest.path().display().to_string(),
				output: project.output_dir.display().to_string(),
				emit_marker_attribute: project.options.emit_marker_attribute,
				properties: &properties,
				candidates: candidates.len(),
			};
			println!("{}", serde_json::to_string(&report)?);
		}
		InfoOutputFormat::Text => {
			print_section("Project");
			print_field("Root", project.root.display());
			print_field(
				"Resolved config",
				project
					.config_path
					.as_ref()
					.map_or_else(|| "(none)".to_string(), |path| path.display().to_string()),
			);
			print_field("Declarations", project.manifest.path().display());
			print_field("Output directory", project.output_dir.display());
			print_field("Marker attribute", project.options.emit_marker_attribute);

			print_section("Properties");
			if properties.is_empty() {
				println!("(none)");
			}
			for (key, value) in properties.iter() {
				print_field(key, value);
			}

			print_section("Declarations");
			print_field("Candidates", candidates.len());
		}
	}

	Ok(true)
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<28} {value}");
}

fn print_diagnostics(diagnostics: &[Diagnostic], root: &Path, deny_warnings: bool) {
	for diagnostic in diagnostics {
		let report = diagnostic_to_report(diagnostic, root, deny_warnings);
		eprintln!("{report:?}");
	}
}

fn print_github_annotations(diagnostics: &[Diagnostic], root: &Path) {
	for diagnostic in diagnostics {
		let mut properties = Vec::new();
		if let Some(location) = &diagnostic.location {
			properties.push(format!("file={}", make_relative(&location.file, root)));
			if let Some(line) = location.line {
				properties.push(format!("line={line}"));
			}
			if let Some(column) = location.column {
				properties.push(format!("col={column}"));
			}
		}

		let level = match diagnostic.severity() {
			Severity::Warning => "warning",
			Severity::Error => "error",
		};
		println!(
			"::{level} {}::{}: {}",
			properties.join(","),
			diagnostic.code(),
			diagnostic.message()
		);
	}
}

fn diagnostic_reports<'a>(diagnostics: &'a [Diagnostic], root: &Path) -> Vec<DiagnosticReport<'a>> {
	diagnostics
		.iter()
		.map(|diagnostic| {
			let location = diagnostic.location.as_ref();
			DiagnosticReport {
				code: diagnostic.code(),
				severity: diagnostic.severity(),
				message: diagnostic.message(),
				arguments: &diagnostic.arguments,
				file: location.map(|location| make_relative(&location.file, root)),
				line: location.and_then(|location| location.line),
				column: location.and_then(|location| location.column),
			}
		})
		.collect()
}

/// Convert a declaration [`Diagnostic`] into a `miette::Report` with
/// severity, code and help text for rich terminal display.
fn diagnostic_to_report(diagnostic: &Diagnostic, root: &Path, deny_warnings: bool) -> miette::Report {
	let severity = if deny_warnings || diagnostic.severity() == Severity::Error {
		miette::Severity::Error
	} else {
		miette::Severity::Warning
	};

	let message = match &diagnostic.location {
		Some(location) => {
			let mut rel = make_relative(&location.file, root);
			if let Some(line) = location.line {
				rel.push_str(&format!(":{line}"));
			}
			format!("[{rel}] {}", diagnostic.message())
		}
		None => diagnostic.message(),
	};
	let help = match diagnostic.kind {
		DiagnosticKind::InvalidShape => {
			"declare the member as `static partial` with a getter, or as a parameterless \
			 `static partial` method"
		}
		DiagnosticKind::UnsupportedType => {
			"supported types: string, int, bool and their nullable forms"
		}
	};

	let diag_value = miette::MietteDiagnostic::new(message)
		.with_code(diagnostic.code())
		.with_help(help)
		.with_severity(severity);
	miette::Report::new(diag_value)
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
