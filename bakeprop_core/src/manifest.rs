use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Accessibility;
use crate::BakeError;
use crate::BakeResult;
use crate::CandidateDeclaration;
use crate::ContainerId;
use crate::ContainerKind;
use crate::DeclarationSource;
use crate::MemberShape;
use crate::SourceLocation;

/// File formats a declaration manifest can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
	Toml,
	Json,
	Yaml,
}

impl ManifestFormat {
	/// Pick the format from the file extension.
	pub fn from_path(path: &Path) -> BakeResult<Self> {
		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.unwrap_or_default()
			.to_ascii_lowercase();

		match extension.as_str() {
			"toml" => Ok(Self::Toml),
			"json" => Ok(Self::Json),
			"yaml" | "yml" => Ok(Self::Yaml),
			_ => Err(BakeError::UnsupportedManifestFormat(extension)),
		}
	}
}

/// A hand-written registration list of declarations.
///
/// ```toml
/// [[container]]
/// namespace = "Develop"
/// name = "Variants"
/// kind = "reference"
///
/// [[container.member]]
/// name = "Flavor"
/// type = "string"
///
/// [[container.member]]
/// name = "Key"
/// type = "string?"
/// key = "SecretKey"
/// shape = "method"
/// ```
///
/// Members default to `public`, `static = true`, `partial = true`,
/// `shape = "property"` with `getter = true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationManifest {
	path: PathBuf,
	candidates: Vec<CandidateDeclaration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
	#[serde(default, rename = "container")]
	containers: Vec<RawContainer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContainer {
	#[serde(default)]
	namespace: String,
	name: String,
	#[serde(default)]
	kind: ContainerKind,
	/// Source file the container lives in, used for diagnostics.
	#[serde(default)]
	file: Option<PathBuf>,
	#[serde(default, rename = "member")]
	members: Vec<RawMember>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawShape {
	#[default]
	Property,
	Method,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMember {
	name: String,
	#[serde(rename = "type")]
	value_type: String,
	#[serde(default)]
	accessibility: Accessibility,
	#[serde(default = "default_true", rename = "static")]
	is_static: bool,
	#[serde(default = "default_true")]
	partial: bool,
	#[serde(default)]
	shape: RawShape,
	#[serde(default = "default_true")]
	getter: bool,
	#[serde(default)]
	parameters: usize,
	#[serde(default)]
	key: Option<String>,
	#[serde(default)]
	file: Option<PathBuf>,
	#[serde(default)]
	line: Option<usize>,
	#[serde(default)]
	column: Option<usize>,
}

fn default_true() -> bool {
	true
}

impl DeclarationManifest {
	/// Read and parse the manifest at `path`.
	pub fn load(path: &Path) -> BakeResult<Self> {
		let format = ManifestFormat::from_path(path)?;
		let content = std::fs::read_to_string(path)?;
		Self::parse(&content, format, path)
	}

	/// Parse manifest `content`. `path` is recorded as the default location
	/// of every declaration.
	pub fn parse(content: &str, format: ManifestFormat, path: &Path) -> BakeResult<Self> {
		let path_display = path.display().to_string();
		let manifest_error = |reason: String| {
			BakeError::ManifestParse {
				path: path_display.clone(),
				reason,
			}
		};

		let raw: RawManifest = match format {
			ManifestFormat::Toml => toml::from_str(content).map_err(|e| manifest_error(e.to_string()))?,
			ManifestFormat::Json => {
				serde_json::from_str(content).map_err(|e| manifest_error(e.to_string()))?
			}
			ManifestFormat::Yaml => {
				serde_yaml_ng::from_str(content).map_err(|e| manifest_error(e.to_string()))?
			}
		};

		let candidates = raw
			.containers
			.into_iter()
			.flat_map(|container| flatten_container(container, path))
			.collect::<Vec<_>>();
		tracing::debug!(path = %path_display, candidates = candidates.len(), "loaded declaration manifest");

		Ok(Self {
			path: path.to_path_buf(),
			candidates,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}
}

fn flatten_container(container: RawContainer, manifest_path: &Path) -> Vec<CandidateDeclaration> {
	let id = ContainerId::new(container.namespace, container.name, container.kind);
	let container_file = container.file;

	container
		.members
		.into_iter()
		.map(|member| {
			let shape = match member.shape {
				RawShape::Property => MemberShape::Property {
					has_getter: member.getter,
				},
				RawShape::Method => MemberShape::Method {
					parameter_count: member.parameters,
				},
			};
			let file = member
				.file
				.or_else(|| container_file.clone())
				.unwrap_or_else(|| manifest_path.to_path_buf());

			CandidateDeclaration {
				name: member.name,
				value_type: member.value_type,
				accessibility: member.accessibility,
				is_static: member.is_static,
				is_completable: member.partial,
				shape,
				key_override: member.key,
				container: id.clone(),
				location: Some(SourceLocation {
					file,
					line: member.line,
					column: member.column,
				}),
			}
		})
		.collect()
}

impl DeclarationSource for DeclarationManifest {
	fn candidates(&self) -> Vec<CandidateDeclaration> {
		self.candidates.clone()
	}
}
