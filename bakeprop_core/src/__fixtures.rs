use std::path::PathBuf;

use crate::CandidateDeclaration;
use crate::ContainerId;
use crate::ContainerKind;
use crate::SourceLocation;

pub fn variants_container() -> ContainerId {
	ContainerId::new("Develop", "Variants", ContainerKind::Reference)
}

pub fn secrets_container() -> ContainerId {
	ContainerId::new("Example.App", "Secrets", ContainerKind::Value)
}

pub fn location(line: usize) -> SourceLocation {
	SourceLocation {
		file: PathBuf::from("Develop/Variants.cs"),
		line: Some(line),
		column: Some(5),
	}
}

/// The four members of the `Develop.Variants` sample class.
pub fn variants_candidates() -> Vec<CandidateDeclaration> {
	let container = variants_container();
	vec![
		CandidateDeclaration::property(container.clone(), "Flavor", "string"),
		CandidateDeclaration::property(container.clone(), "Key", "string?").with_key("SecretKey"),
		CandidateDeclaration::property(container.clone(), "Code", "int"),
		CandidateDeclaration::property(container, "Flag", "bool"),
	]
}

/// Method-shaped members of a value-type container in a nested namespace.
pub fn secrets_candidates() -> Vec<CandidateDeclaration> {
	let container = secrets_container();
	vec![
		CandidateDeclaration::method(container.clone(), "Key", "string").with_key("SecretKey"),
		CandidateDeclaration::method(container, "Vector", "string"),
	]
}

pub fn non_static_candidate() -> CandidateDeclaration {
	CandidateDeclaration {
		is_static: false,
		..CandidateDeclaration::property(variants_container(), "Instance", "string")
	}
	.with_location(location(20))
}

pub fn double_candidate() -> CandidateDeclaration {
	CandidateDeclaration::property(variants_container(), "Ratio", "double").with_location(location(24))
}
