use std::fmt;

use serde::Serialize;

use crate::SourceLocation;

/// Severity attached to a diagnostic descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Warning => f.write_str("warning"),
			Self::Error => f.write_str("error"),
		}
	}
}

/// Static description of a diagnostic: its code, title and message
/// template. `{0}`, `{1}`, ... in the template are replaced by the
/// diagnostic's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticDescriptor {
	pub id: &'static str,
	pub title: &'static str,
	pub message_format: &'static str,
	pub category: &'static str,
	pub severity: Severity,
}

pub const INVALID_DECLARATION: DiagnosticDescriptor = DiagnosticDescriptor {
	id: "BTBP0001",
	title: "Invalid property definition",
	message_format: "Property must be static partial and has getter. property=[{0}]",
	category: "Usage",
	severity: Severity::Warning,
};

pub const UNSUPPORTED_TYPE: DiagnosticDescriptor = DiagnosticDescriptor {
	id: "BTBP0002",
	title: "Unsupported property type",
	message_format: "Unsupported property type. type=[{0}]",
	category: "Usage",
	severity: Severity::Warning,
};

/// The classes of per-declaration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
	/// Not static, not completable, or no zero-argument accessor.
	InvalidShape,
	/// Declared value type outside the supported set.
	UnsupportedType,
}

impl DiagnosticKind {
	pub fn descriptor(self) -> &'static DiagnosticDescriptor {
		match self {
			Self::InvalidShape => &INVALID_DECLARATION,
			Self::UnsupportedType => &UNSUPPORTED_TYPE,
		}
	}
}

/// A non-fatal problem with one candidate declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
	pub kind: DiagnosticKind,
	pub location: Option<SourceLocation>,
	pub arguments: Vec<String>,
}

impl Diagnostic {
	pub fn invalid_shape(member: &str, location: Option<SourceLocation>) -> Self {
		Self {
			kind: DiagnosticKind::InvalidShape,
			location,
			arguments: vec![member.to_string()],
		}
	}

	pub fn unsupported_type(value_type: &str, location: Option<SourceLocation>) -> Self {
		Self {
			kind: DiagnosticKind::UnsupportedType,
			location,
			arguments: vec![value_type.to_string()],
		}
	}

	pub fn descriptor(&self) -> &'static DiagnosticDescriptor {
		self.kind.descriptor()
	}

	pub fn code(&self) -> &'static str {
		self.descriptor().id
	}

	pub fn severity(&self) -> Severity {
		self.descriptor().severity
	}

	/// The message template with arguments substituted.
	pub fn message(&self) -> String {
		self.arguments
			.iter()
			.enumerate()
			.fold(
				self.descriptor().message_format.to_string(),
				|message, (index, argument)| message.replace(&format!("{{{index}}}"), argument),
			)
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(location) = &self.location {
			write!(f, "{location}: ")?;
		}

		write!(f, "{} {}: {}", self.severity(), self.code(), self.message())
	}
}

/// Accumulates diagnostics across a whole run, in discovery order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
	diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn report(&mut self, diagnostic: Diagnostic) {
		tracing::trace!(code = diagnostic.code(), "{}", diagnostic.message());
		self.diagnostics.push(diagnostic);
	}

	pub fn len(&self) -> usize {
		self.diagnostics.len()
	}

	pub fn is_empty(&self) -> bool {
		self.diagnostics.is_empty()
	}

	pub fn into_diagnostics(self) -> Vec<Diagnostic> {
		self.diagnostics
	}
}

impl Extend<Diagnostic> for DiagnosticCollector {
	fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
		for diagnostic in iter {
			self.report(diagnostic);
		}
	}
}
