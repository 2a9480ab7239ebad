use std::sync::Arc;

use serde::Serialize;

use crate::BakeResult;
use crate::CachePass;
use crate::CancellationToken;
use crate::CandidateDeclaration;
use crate::DeclarationSource;
use crate::Diagnostic;
use crate::DiagnosticCollector;
use crate::GeneratedUnit;
use crate::GenerationCache;
use crate::PropertyMap;
use crate::ValidatedModel;
use crate::emit::FilenameAllocator;
use crate::emit::MARKER_ATTRIBUTE_FILENAME;
use crate::emit::marker_attribute_unit;
use crate::emit::emit;
use crate::group::group_models;
use crate::properties::resolve;
use crate::validate::validate;

/// Namespace the marker attribute is declared in by default.
pub const DEFAULT_MARKER_NAMESPACE: &str = "BakeProp";

/// Options for a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerateOptions {
	/// Also emit the declaration of the marker attribute.
	pub emit_marker_attribute: bool,
	/// Namespace for the marker attribute declaration.
	pub marker_namespace: String,
}

impl Default for GenerateOptions {
	fn default() -> Self {
		Self {
			emit_marker_attribute: false,
			marker_namespace: DEFAULT_MARKER_NAMESPACE.to_string(),
		}
	}
}

/// Result of one generation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationOutput {
	/// One unit per container, in order of first discovery.
	pub units: Vec<GeneratedUnit>,
	/// One diagnostic per rejected candidate, in discovery order.
	pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
	pub fn has_diagnostics(&self) -> bool {
		!self.diagnostics.is_empty()
	}
}

/// Runs the discovery → validation → resolution → emission pass.
#[derive(Debug, Clone, Default)]
pub struct Generator {
	options: GenerateOptions,
	cache: Option<Arc<GenerationCache>>,
}

impl Generator {
	pub fn new(options: GenerateOptions) -> Self {
		Self {
			options,
			cache: None,
		}
	}

	/// Share a memo cache across passes.
	#[must_use]
	pub fn with_cache(mut self, cache: Arc<GenerationCache>) -> Self {
		self.cache = Some(cache);
		self
	}

	pub fn options(&self) -> &GenerateOptions {
		&self.options
	}

	/// Generate units for every valid candidate in `source`.
	///
	/// Invalid candidates become diagnostics and never stop the pass. The
	/// only early exit is cancellation, checked before each candidate and
	/// each group, in which case no units are returned.
	pub fn generate<S>(
		&self,
		raw_properties: Option<&str>,
		source: &S,
		cancel: &CancellationToken,
	) -> BakeResult<GenerationOutput>
	where
		S: DeclarationSource + ?Sized,
	{
		let cache_pass = self.cache.as_deref().map(GenerationCache::begin_pass);
		let pass = cache_pass.as_ref();
		let properties = resolve_properties(pass, raw_properties);
		let candidates = source.candidates();
		tracing::debug!(
			candidates = candidates.len(),
			properties = properties.len(),
			"starting generation pass"
		);

		let mut collector = DiagnosticCollector::new();
		let mut models: Vec<ValidatedModel> = Vec::with_capacity(candidates.len());
		for candidate in &candidates {
			cancel.check()?;

			match validate_candidate(pass, candidate) {
				Ok(model) => {
					tracing::trace!(
						member = %model.member_name,
						key = %model.resolved_key,
						"accepted declaration"
					);
					models.push(model);
				}
				Err(diagnostic) => collector.report(diagnostic),
			}
		}

		let groups = group_models(models);
		let mut allocator = FilenameAllocator::new();
		let mut units = Vec::with_capacity(groups.len() + 1);

		if self.options.emit_marker_attribute {
			allocator.reserve(MARKER_ATTRIBUTE_FILENAME);
			units.push(marker_attribute_unit(&self.options.marker_namespace));
		}

		for group in &groups {
			cancel.check()?;

			let unit = match pass {
				Some(pass) => {
					GeneratedUnit {
						filename: allocator.allocate(&group.id.namespace, &group.id.name),
						text: pass.unit_text(group, &properties).to_string(),
					}
				}
				None => emit(group, &properties, &mut allocator),
			};
			tracing::trace!(filename = %unit.filename, members = group.members.len(), "emitted unit");
			units.push(unit);
		}

		if let Some(cache_pass) = cache_pass {
			cache_pass.finish();
		}

		tracing::debug!(
			units = units.len(),
			diagnostics = collector.len(),
			"finished generation pass"
		);

		Ok(GenerationOutput {
			units,
			diagnostics: collector.into_diagnostics(),
		})
	}
}

fn resolve_properties(pass: Option<&CachePass<'_>>, raw: Option<&str>) -> Arc<PropertyMap> {
	match pass {
		Some(pass) => pass.properties(raw),
		None => Arc::new(resolve(raw)),
	}
}

fn validate_candidate(
	pass: Option<&CachePass<'_>>,
	candidate: &CandidateDeclaration,
) -> Result<ValidatedModel, Diagnostic> {
	match pass {
		Some(pass) => pass.validate(candidate),
		None => validate(candidate),
	}
}

/// Run a single uncached pass with default options.
pub fn generate<S>(raw_properties: Option<&str>, source: &S) -> GenerationOutput
where
	S: DeclarationSource + ?Sized,
{
	let cancel = CancellationToken::new();
	// A fresh token is never raised, so the pass always completes.
	Generator::default()
		.generate(raw_properties, source, &cancel)
		.unwrap_or_default()
}
