use miette::Diagnostic;
use thiserror::Error;

/// Errors that stop a run or a host operation as a whole.
///
/// Problems with individual declarations are never reported through this
/// type. They surface as [`crate::Diagnostic`] values next to the generated
/// units so that one bad declaration cannot block the rest.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BakeError {
	#[error(transparent)]
	#[diagnostic(code(bakeprop::io_error))]
	Io(#[from] std::io::Error),

	#[error("generation was cancelled")]
	#[diagnostic(code(bakeprop::cancelled))]
	Cancelled,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(bakeprop::config_parse),
		help("check that bakeprop.toml is valid TOML with `properties`, `declarations` and `output` keys")
	)]
	ConfigParse(String),

	#[error("failed to parse declaration manifest `{path}`: {reason}")]
	#[diagnostic(
		code(bakeprop::manifest_parse),
		help("each `[[container]]` needs a `name` and a list of `[[container.member]]` entries")
	)]
	ManifestParse { path: String, reason: String },

	#[error("unsupported declaration manifest format: `{0}`")]
	#[diagnostic(
		code(bakeprop::unsupported_manifest_format),
		help("supported formats: toml, json, yaml, yml")
	)]
	UnsupportedManifestFormat(String),

	#[error("no declaration manifest configured")]
	#[diagnostic(
		code(bakeprop::missing_manifest),
		help("pass `--declarations <path>` or set `declarations` in bakeprop.toml")
	)]
	MissingManifest,
}

pub type BakeResult<T> = Result<T, BakeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
