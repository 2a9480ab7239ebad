use serde::Serialize;

use crate::Accessibility;
use crate::CandidateDeclaration;
use crate::ContainerKind;
use crate::Diagnostic;
use crate::MemberShape;
use crate::format::TypeRef;

/// A candidate that passed validation, normalized for emission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidatedModel {
	pub namespace: String,
	pub container_name: String,
	pub container_kind: ContainerKind,
	pub accessibility: Accessibility,
	/// The declared type text, emitted verbatim.
	pub value_type: String,
	/// The parsed form of `value_type` used to pick a formatter.
	pub type_ref: TypeRef,
	pub member_name: String,
	pub shape: MemberShape,
	/// Configuration key: the explicit override when non-empty, otherwise the
	/// member name.
	pub resolved_key: String,
}

/// Check one candidate and extract its model, or explain why it cannot be
/// generated.
///
/// Shape is checked before type, so a non-static member with an unsupported
/// type reports the shape problem.
pub fn validate(candidate: &CandidateDeclaration) -> Result<ValidatedModel, Diagnostic> {
	if !candidate.is_static || !candidate.is_completable || !candidate.has_accessor() {
		return Err(Diagnostic::invalid_shape(
			&candidate.name,
			candidate.location.clone(),
		));
	}

	let Some(type_ref) = TypeRef::parse(&candidate.value_type) else {
		return Err(Diagnostic::unsupported_type(
			candidate.value_type.trim(),
			candidate.location.clone(),
		));
	};

	let resolved_key = candidate
		.key_override
		.as_deref()
		.filter(|key| !key.is_empty())
		.unwrap_or(&candidate.name)
		.to_string();

	Ok(ValidatedModel {
		namespace: candidate.container.namespace.clone(),
		container_name: candidate.container.name.clone(),
		container_kind: candidate.container.kind,
		accessibility: candidate.accessibility,
		value_type: candidate.value_type.trim().to_string(),
		type_ref,
		member_name: candidate.name.clone(),
		shape: candidate.shape,
		resolved_key,
	})
}
