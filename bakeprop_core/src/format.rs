use std::fmt;

use serde::Serialize;

/// Expression emitted for a member whose key has no configured value.
pub const DEFAULT_PLACEHOLDER: &str = "default!";

/// Marker appended to a type name to make it optional.
const OPTIONAL_MARKER: char = '?';

/// The value types a generated member may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
	String,
	Int,
	Bool,
}

impl ValueType {
	fn from_keyword(keyword: &str) -> Option<Self> {
		match keyword {
			"string" => Some(Self::String),
			"int" => Some(Self::Int),
			"bool" => Some(Self::Bool),
			_ => None,
		}
	}

	pub fn keyword(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Int => "int",
			Self::Bool => "bool",
		}
	}

	/// Render `raw` as a literal of this type.
	///
	/// Strings become verbatim literals with interior quotes doubled;
	/// backslashes are left untouched. Integers and booleans are emitted as
	/// written and are not checked.
	pub fn format(self, raw: &str) -> String {
		match self {
			Self::String => format!("@\"{}\"", raw.replace('"', "\"\"")),
			Self::Int | Self::Bool => raw.to_string(),
		}
	}
}

/// A supported declared type: a base value type, optionally nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef {
	pub base: ValueType,
	pub optional: bool,
}

impl TypeRef {
	/// Parse declared type text such as `string` or `int?`. Returns `None`
	/// for anything outside the supported set.
	pub fn parse(text: &str) -> Option<Self> {
		let text = text.trim();
		let (base, optional) = match text.strip_suffix(OPTIONAL_MARKER) {
			Some(base) => (base, true),
			None => (text, false),
		};

		ValueType::from_keyword(base).map(|base| Self { base, optional })
	}

	/// Optional and non-optional types format identically.
	pub fn format(self, raw: &str) -> String {
		self.base.format(raw)
	}
}

impl fmt::Display for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.base.keyword())?;
		if self.optional {
			write!(f, "{OPTIONAL_MARKER}")?;
		}

		Ok(())
	}
}

/// Format `raw` for the declared `value_type` text.
///
/// Returns `None` when the type is not supported.
pub fn format_value(value_type: &str, raw: &str) -> Option<String> {
	TypeRef::parse(value_type).map(|ty| ty.format(raw))
}
