use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Declared accessibility of a member, preserved verbatim in generated
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Accessibility {
	#[default]
	#[serde(rename = "public")]
	Public,
	#[serde(rename = "internal")]
	Internal,
	#[serde(rename = "protected")]
	Protected,
	#[serde(rename = "private")]
	Private,
	#[serde(rename = "protected internal", alias = "protected_internal")]
	ProtectedInternal,
	#[serde(rename = "private protected", alias = "private_protected")]
	PrivateProtected,
}

impl Accessibility {
	/// The modifier text used in generated source.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Internal => "internal",
			Self::Protected => "protected",
			Self::Private => "private",
			Self::ProtectedInternal => "protected internal",
			Self::PrivateProtected => "private protected",
		}
	}
}

impl fmt::Display for Accessibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.keyword())
	}
}

/// Whether the enclosing type is copied or shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
	/// Value semantics, re-opened as a `struct`.
	Value,
	/// Reference semantics, re-opened as a `class`.
	#[default]
	Reference,
}

impl ContainerKind {
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Value => "struct",
			Self::Reference => "class",
		}
	}
}

/// Identity of the container enclosing a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId {
	/// Dotted namespace. Empty for the global namespace.
	#[serde(default)]
	pub namespace: String,
	/// Container name, including any generic parameter list (`Cache<T>`).
	pub name: String,
	#[serde(default)]
	pub kind: ContainerKind,
}

impl ContainerId {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ContainerKind) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
			kind,
		}
	}
}

/// The syntactic shape a host presents for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum MemberShape {
	/// A property-like member, `Name { get; }`.
	Property { has_getter: bool },
	/// A method-like member, `Name()`.
	Method { parameter_count: usize },
}

impl MemberShape {
	/// Whether the member can produce a value without arguments.
	pub fn has_accessor(self) -> bool {
		match self {
			Self::Property { has_getter } => has_getter,
			Self::Method { parameter_count } => parameter_count == 0,
		}
	}
}

/// Where a declaration was found. Line and column are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
	pub file: PathBuf,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub column: Option<usize>,
}

impl fmt::Display for SourceLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.file.display())?;
		if let Some(line) = self.line {
			write!(f, ":{line}")?;
			if let Some(column) = self.column {
				write!(f, ":{column}")?;
			}
		}

		Ok(())
	}
}

/// A member flagged for generation, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateDeclaration {
	pub name: String,
	/// Declared value type as written, e.g. `string` or `int?`.
	pub value_type: String,
	pub accessibility: Accessibility,
	pub is_static: bool,
	/// The member has no body yet and is marked to be completed by
	/// generation.
	pub is_completable: bool,
	pub shape: MemberShape,
	/// Explicit configuration key attached to the marker, if any.
	pub key_override: Option<String>,
	pub container: ContainerId,
	pub location: Option<SourceLocation>,
}

impl CandidateDeclaration {
	/// A well-formed static, completable, public property. Hosts and tests
	/// adjust the remaining fields from here.
	pub fn property(container: ContainerId, name: impl Into<String>, value_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value_type: value_type.into(),
			accessibility: Accessibility::Public,
			is_static: true,
			is_completable: true,
			shape: MemberShape::Property { has_getter: true },
			key_override: None,
			container,
			location: None,
		}
	}

	/// A well-formed static, completable, public zero-argument method.
	pub fn method(container: ContainerId, name: impl Into<String>, value_type: impl Into<String>) -> Self {
		Self {
			shape: MemberShape::Method { parameter_count: 0 },
			..Self::property(container, name, value_type)
		}
	}

	#[must_use]
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key_override = Some(key.into());
		self
	}

	#[must_use]
	pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
		self.accessibility = accessibility;
		self
	}

	#[must_use]
	pub fn with_location(mut self, location: SourceLocation) -> Self {
		self.location = Some(location);
		self
	}

	pub fn has_accessor(&self) -> bool {
		self.shape.has_accessor()
	}
}

/// Host capability that discovers candidate declarations.
///
/// Any binding (a compiler plugin, a static analysis pass, a hand-written
/// registration list) can implement this. Candidates must be returned in
/// discovery order, which later drives member order in generated units.
pub trait DeclarationSource {
	fn candidates(&self) -> Vec<CandidateDeclaration>;
}

impl DeclarationSource for [CandidateDeclaration] {
	fn candidates(&self) -> Vec<CandidateDeclaration> {
		self.to_vec()
	}
}

impl DeclarationSource for Vec<CandidateDeclaration> {
	fn candidates(&self) -> Vec<CandidateDeclaration> {
		self.clone()
	}
}
