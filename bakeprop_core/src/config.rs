use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BakeError;
use crate::BakeResult;
use crate::GenerateOptions;
use crate::generator::DEFAULT_MARKER_NAMESPACE;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"bakeprop.toml",
	".bakeprop.toml",
	".config/bakeprop.toml",
];

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "Generated";

/// Configuration loaded from a `bakeprop.toml` file.
///
/// ```toml
/// # Raw build properties, `key=value` pairs separated by commas.
/// properties = "Flavor=Debug,Code=42,Flag=true"
///
/// # Declaration manifest (toml, json or yaml), relative to the project root.
/// declarations = "declarations.toml"
///
/// # Directory generated units are written to.
/// output = "Generated"
///
/// [marker]
/// emit = true
/// namespace = "BakeProp"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BakeConfig {
	/// Raw build property string. Overridden by the environment and the
	/// command line.
	#[serde(default)]
	pub properties: Option<String>,
	/// Path to the declaration manifest.
	#[serde(default)]
	pub declarations: Option<PathBuf>,
	/// Directory generated units are written to.
	#[serde(default)]
	pub output: Option<PathBuf>,
	/// Marker attribute emission.
	#[serde(default)]
	pub marker: MarkerConfig,
}

/// Controls whether the marker attribute declaration is emitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
	#[serde(default)]
	pub emit: bool,
	#[serde(default = "default_marker_namespace")]
	pub namespace: String,
}

impl Default for MarkerConfig {
	fn default() -> Self {
		Self {
			emit: false,
			namespace: default_marker_namespace(),
		}
	}
}

fn default_marker_namespace() -> String {
	DEFAULT_MARKER_NAMESPACE.to_string()
}

impl BakeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> BakeResult<Option<BakeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: BakeConfig =
			toml::from_str(&content).map_err(|e| BakeError::ConfigParse(e.to_string()))?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Generation options described by this config.
	pub fn generate_options(&self) -> GenerateOptions {
		GenerateOptions {
			emit_marker_attribute: self.marker.emit,
			marker_namespace: self.marker.namespace.clone(),
		}
	}

	/// The output directory, resolved against `root`.
	pub fn output_dir(&self, root: &Path) -> PathBuf {
		root.join(
			self.output
				.as_deref()
				.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR)),
		)
	}
}
