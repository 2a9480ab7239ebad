use std::collections::HashSet;

use serde::Serialize;

use crate::ContainerGroup;
use crate::MemberShape;
use crate::PropertyMap;
use crate::ValidatedModel;
use crate::format::DEFAULT_PLACEHOLDER;

/// Suffix shared by every generated file.
pub const GENERATED_FILE_SUFFIX: &str = ".g.cs";

/// Filename of the optional marker attribute unit.
pub const MARKER_ATTRIBUTE_FILENAME: &str = "BuildPropertyAttribute.g.cs";

const AUTO_GENERATED_HEADER: &str = "// <auto-generated />";
const NULLABLE_DIRECTIVE: &str = "#nullable enable";
const INDENT: &str = "    ";

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedUnit {
	pub filename: String,
	pub text: String,
}

/// Line-oriented text builder that tracks brace depth.
#[derive(Debug, Default)]
struct SourceWriter {
	buffer: String,
	depth: usize,
}

impl SourceWriter {
	fn line(&mut self, text: &str) -> &mut Self {
		for _ in 0..self.depth {
			self.buffer.push_str(INDENT);
		}
		self.buffer.push_str(text);
		self.buffer.push('\n');
		self
	}

	fn blank(&mut self) -> &mut Self {
		self.buffer.push('\n');
		self
	}

	fn begin_scope(&mut self) -> &mut Self {
		self.line("{");
		self.depth += 1;
		self
	}

	fn end_scope(&mut self) -> &mut Self {
		self.depth = self.depth.saturating_sub(1);
		self.line("}")
	}

	fn header(&mut self) -> &mut Self {
		self.line(AUTO_GENERATED_HEADER)
			.line(NULLABLE_DIRECTIVE)
			.blank()
	}

	fn finish(self) -> String {
		self.buffer
	}
}

/// Filename stem for a container: namespace separators become `_`, and
/// generic brackets become square brackets.
pub fn filename_stem(namespace: &str, container_name: &str) -> String {
	let mut stem = String::new();
	if !namespace.is_empty() {
		stem.push_str(&namespace.replace('.', "_"));
		stem.push('_');
	}

	stem.extend(container_name.chars().map(|c| {
		match c {
			'<' => '[',
			'>' => ']',
			other => other,
		}
	}));
	stem
}

/// Deterministic filename for a container.
pub fn make_filename(namespace: &str, container_name: &str) -> String {
	format!("{}{GENERATED_FILE_SUFFIX}", filename_stem(namespace, container_name))
}

/// Hands out filenames that are unique within one run.
///
/// Different containers can collapse onto the same stem (namespace `A_B`
/// and namespace `A.B`). The first keeps the plain name, later ones get
/// `.2`, `.3`, ... before the suffix.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
	used: HashSet<String>,
}

impl FilenameAllocator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark `filename` as taken without allocating it.
	pub fn reserve(&mut self, filename: impl Into<String>) {
		self.used.insert(filename.into());
	}

	pub fn allocate(&mut self, namespace: &str, container_name: &str) -> String {
		let stem = filename_stem(namespace, container_name);
		let mut candidate = format!("{stem}{GENERATED_FILE_SUFFIX}");
		let mut counter = 2_usize;

		while self.used.contains(&candidate) {
			candidate = format!("{stem}.{counter}{GENERATED_FILE_SUFFIX}");
			counter += 1;
		}

		if counter > 2 {
			tracing::debug!(%stem, filename = %candidate, "generated filename collided; disambiguated");
		}

		self.used.insert(candidate.clone());
		candidate
	}
}

/// The value expression for one member: the formatted configured value, or
/// the default placeholder when its key is not configured.
pub fn member_expression(model: &ValidatedModel, properties: &PropertyMap) -> String {
	match properties.value(&model.resolved_key) {
		Some(raw) => model.type_ref.format(raw),
		None => DEFAULT_PLACEHOLDER.to_string(),
	}
}

fn member_declaration(model: &ValidatedModel, properties: &PropertyMap) -> String {
	let parameters = match model.shape {
		MemberShape::Property { .. } => "",
		MemberShape::Method { .. } => "()",
	};

	format!(
		"{} static partial {} {}{parameters} => {};",
		model.accessibility.keyword(),
		model.value_type,
		model.member_name,
		member_expression(model, properties),
	)
}

/// Render the text of the unit for `group`.
pub fn render_unit_text(group: &ContainerGroup, properties: &PropertyMap) -> String {
	let mut writer = SourceWriter::default();
	writer.header();

	let has_namespace = !group.id.namespace.is_empty();
	if has_namespace {
		writer
			.line(&format!("namespace {}", group.id.namespace))
			.begin_scope();
	}

	writer
		.line(&format!("partial {} {}", group.id.kind.keyword(), group.id.name))
		.begin_scope();

	for (position, model) in group.members.iter().enumerate() {
		if position > 0 {
			writer.blank();
		}
		writer.line(&member_declaration(model, properties));
	}

	writer.end_scope();
	if has_namespace {
		writer.end_scope();
	}

	writer.finish()
}

/// Emit the unit for one container group, taking its filename from
/// `allocator` so that it stays unique among the units of the same run.
pub fn emit(
	group: &ContainerGroup,
	properties: &PropertyMap,
	allocator: &mut FilenameAllocator,
) -> GeneratedUnit {
	GeneratedUnit {
		filename: allocator.allocate(&group.id.namespace, &group.id.name),
		text: render_unit_text(group, properties),
	}
}

/// The declaration of the marker attribute that flags members for
/// generation. `Key` carries the optional configuration key override.
pub fn marker_attribute_unit(namespace: &str) -> GeneratedUnit {
	let mut writer = SourceWriter::default();
	writer.header();

	let has_namespace = !namespace.is_empty();
	if has_namespace {
		writer.line(&format!("namespace {namespace}")).begin_scope();
	}

	writer
		.line("[global::System.Diagnostics.Conditional(\"COMPILE_TIME_ONLY\")]")
		.line(
			"[global::System.AttributeUsage(global::System.AttributeTargets.Property | \
			 global::System.AttributeTargets.Method, AllowMultiple = false)]",
		)
		.line("internal sealed class BuildPropertyAttribute : global::System.Attribute")
		.begin_scope()
		.line("public BuildPropertyAttribute()")
		.begin_scope()
		.line("Key = string.Empty;")
		.end_scope()
		.blank()
		.line("public BuildPropertyAttribute(string key)")
		.begin_scope()
		.line("Key = key;")
		.end_scope()
		.blank()
		.line("public string Key { get; }")
		.end_scope();

	if has_namespace {
		writer.end_scope();
	}

	GeneratedUnit {
		filename: MARKER_ATTRIBUTE_FILENAME.to_string(),
		text: writer.finish(),
	}
}
