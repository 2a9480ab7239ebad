use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::config::BakeConfig;
use crate::emit::FilenameAllocator;
use crate::emit::emit;
use crate::emit::make_filename;
use crate::emit::marker_attribute_unit;
use crate::format::DEFAULT_PLACEHOLDER;
use crate::format::TypeRef;
use crate::format::ValueType;
use crate::format::format_value;
use crate::manifest::DeclarationManifest;
use crate::manifest::ManifestFormat;
use crate::properties::BuildProperty;
use crate::properties::parse_entries;
use crate::properties::resolve;
use crate::validate::validate;

fn map(pairs: &[(&str, &str)]) -> PropertyMap {
	pairs
		.iter()
		.map(|(key, value)| BuildProperty::new(*key, *value))
		.collect()
}

#[rstest]
#[case::absent(None, map(&[]))]
#[case::empty(Some(""), map(&[]))]
#[case::whitespace(Some("   "), map(&[]))]
#[case::single(Some("Flavor=Debug"), map(&[("Flavor", "Debug")]))]
#[case::trimmed(Some("  Flavor =  Debug , Code= 42 "), map(&[("Flavor", "Debug"), ("Code", "42")]))]
#[case::malformed(Some("a=b,,c=,=d"), map(&[("a", "b"), ("c", "")]))]
#[case::no_separator(Some("orphan,a=1"), map(&[("a", "1")]))]
#[case::first_equals_splits(Some("url=a=b"), map(&[("url", "a=b")]))]
#[case::duplicate_last_wins(Some("a=1,a=2"), map(&[("a", "2")]))]
fn resolve_properties(#[case] raw: Option<&str>, #[case] expected: PropertyMap) {
	assert_eq!(resolve(raw), expected);
}

#[rstest]
#[case("a=b,,c=,=d")]
#[case("  Flavor =  Debug , Code= 42 ")]
#[case("a=1,a=2,b==,=")]
#[case("key=C:\\path\\to,x")]
fn resolve_is_idempotent_on_its_output(#[case] raw: &str) {
	let first = resolve(Some(raw));
	let second = resolve(Some(&first.to_raw()));
	assert_eq!(second, first);
}

#[test]
fn parse_entries_keeps_order_and_duplicates() {
	let entries = parse_entries("b=2,a=1,b=3");
	assert_eq!(
		entries,
		vec![
			BuildProperty::new("b", "2"),
			BuildProperty::new("a", "1"),
			BuildProperty::new("b", "3"),
		]
	);
}

#[rstest]
#[case::plain_string("string", "Debug", r#"@"Debug""#)]
#[case::quoted_string("string", r#"He said "hi""#, r#"@"He said ""hi""""#)]
#[case::backslashes_untouched("string", r"C:\temp\new", r#"@"C:\temp\new""#)]
#[case::optional_string("string?", "x", r#"@"x""#)]
#[case::empty_string("string", "", r#"@"""#)]
#[case::int("int", "42", "42")]
#[case::optional_int("int?", "-7", "-7")]
#[case::bool("bool", "true", "true")]
#[case::unvalidated_int("int", "not a number", "not a number")]
fn format_values(#[case] value_type: &str, #[case] raw: &str, #[case] expected: &str) {
	assert_eq!(format_value(value_type, raw).as_deref(), Some(expected));
}

#[rstest]
#[case("double")]
#[case("string??")]
#[case("String")]
#[case("long")]
#[case("?")]
fn format_rejects_unsupported_types(#[case] value_type: &str) {
	assert_eq!(format_value(value_type, "1"), None);
}

#[test]
fn type_ref_round_trips_display() {
	let ty = TypeRef::parse("bool?");
	assert_eq!(
		ty,
		Some(TypeRef {
			base: ValueType::Bool,
			optional: true,
		})
	);
	assert_eq!(ty.map(|ty| ty.to_string()).as_deref(), Some("bool?"));
}

#[test]
fn validate_accepts_property_and_resolves_override_key() -> Result<(), Diagnostic> {
	let candidates = variants_candidates();
	let model = validate(&candidates[1])?;

	assert_eq!(model.namespace, "Develop");
	assert_eq!(model.container_name, "Variants");
	assert_eq!(model.container_kind, ContainerKind::Reference);
	assert_eq!(model.member_name, "Key");
	assert_eq!(model.value_type, "string?");
	assert_eq!(model.resolved_key, "SecretKey");
	assert!(model.type_ref.optional);

	Ok(())
}

#[test]
fn validate_falls_back_to_member_name_for_empty_override() -> Result<(), Diagnostic> {
	let candidate =
		CandidateDeclaration::property(variants_container(), "Flavor", "string").with_key("");
	let model = validate(&candidate)?;
	assert_eq!(model.resolved_key, "Flavor");

	Ok(())
}

#[test]
fn validate_accepts_zero_argument_method() -> Result<(), Diagnostic> {
	let model = validate(&secrets_candidates()[1])?;
	assert_eq!(model.shape, MemberShape::Method { parameter_count: 0 });
	assert_eq!(model.container_kind, ContainerKind::Value);

	Ok(())
}

#[rstest]
#[case::not_static(non_static_candidate())]
#[case::not_completable(CandidateDeclaration {
	is_completable: false,
	..CandidateDeclaration::property(variants_container(), "Instance", "string")
})]
#[case::no_getter(CandidateDeclaration {
	shape: MemberShape::Property { has_getter: false },
	..CandidateDeclaration::property(variants_container(), "Instance", "string")
})]
#[case::method_with_parameters(CandidateDeclaration {
	shape: MemberShape::Method { parameter_count: 1 },
	..CandidateDeclaration::method(variants_container(), "Instance", "string")
})]
#[case::bad_shape_wins_over_bad_type(CandidateDeclaration {
	is_static: false,
	..CandidateDeclaration::property(variants_container(), "Instance", "double")
})]
fn validate_rejects_invalid_shape(#[case] candidate: CandidateDeclaration) {
	let diagnostic = validate(&candidate).unwrap_err();
	assert_eq!(diagnostic.kind, DiagnosticKind::InvalidShape);
	assert_eq!(diagnostic.arguments, vec!["Instance".to_string()]);
	assert_eq!(diagnostic.location, candidate.location);
}

#[test]
fn validate_rejects_unsupported_type() {
	let diagnostic = validate(&double_candidate()).unwrap_err();
	assert_eq!(diagnostic.kind, DiagnosticKind::UnsupportedType);
	assert_eq!(diagnostic.arguments, vec!["double".to_string()]);
	assert_eq!(diagnostic.code(), "BTBP0002");
	assert_eq!(diagnostic.severity(), Severity::Warning);
}

#[test]
fn diagnostic_messages_substitute_arguments() {
	let shape = validate(&non_static_candidate()).unwrap_err();
	assert_eq!(
		shape.message(),
		"Property must be static partial and has getter. property=[Instance]"
	);
	assert_eq!(
		shape.to_string(),
		"Develop/Variants.cs:20:5: warning BTBP0001: Property must be static partial and has \
		 getter. property=[Instance]"
	);

	let ty = Diagnostic::unsupported_type("decimal", None);
	assert_eq!(
		ty.to_string(),
		"warning BTBP0002: Unsupported property type. type=[decimal]"
	);
}

#[test]
fn group_preserves_discovery_order() {
	let mut candidates = variants_candidates();
	candidates.insert(1, secrets_candidates()[0].clone());
	candidates.push(secrets_candidates()[1].clone());

	let models = candidates
		.iter()
		.filter_map(|candidate| validate(candidate).ok());
	let groups = group_models(models);

	assert_eq!(groups.len(), 2);
	assert_eq!(groups[0].id, variants_container());
	assert_eq!(groups[1].id, secrets_container());

	let names = |group: &ContainerGroup| {
		group
			.members
			.iter()
			.map(|model| model.member_name.clone())
			.collect::<Vec<_>>()
	};
	assert_eq!(names(&groups[0]), vec!["Flavor", "Key", "Code", "Flag"]);
	assert_eq!(names(&groups[1]), vec!["Key", "Vector"]);
}

#[rstest]
#[case::namespaced("Develop", "Variants", "Develop_Variants.g.cs")]
#[case::nested_namespace("Example.App.Config", "Secrets", "Example_App_Config_Secrets.g.cs")]
#[case::global_namespace("", "Globals", "Globals.g.cs")]
#[case::generic("Develop", "Cache<T>", "Develop_Cache[T].g.cs")]
#[case::nested_generic("", "Map<K, List<V>>", "Map[K, List[V]].g.cs")]
fn filenames(#[case] namespace: &str, #[case] container: &str, #[case] expected: &str) {
	assert_eq!(make_filename(namespace, container), expected);
}

#[test]
fn emit_property_unit() {
	let properties = resolve(Some("Flavor=Debug,SecretKey=abc\"x,Code=42"));
	let models = variants_candidates()
		.iter()
		.filter_map(|candidate| validate(candidate).ok())
		.collect::<Vec<_>>();
	let groups = group_models(models);
	let unit = emit(&groups[0], &properties, &mut FilenameAllocator::new());

	assert_eq!(unit.filename, "Develop_Variants.g.cs");
	insta::assert_snapshot!(unit.text, @r###"
// <auto-generated />
#nullable enable

namespace Develop
{
    partial class Variants
    {
        public static partial string Flavor => @"Debug";

        public static partial string? Key => @"abc""x";

        public static partial int Code => 42;

        public static partial bool Flag => default!;
    }
}
"###);
}

#[test]
fn emit_method_unit_for_value_container() {
	let properties = resolve(Some(r"SecretKey=s3cr\et"));
	let models = secrets_candidates()
		.iter()
		.filter_map(|candidate| validate(candidate).ok())
		.collect::<Vec<_>>();
	let groups = group_models(models);
	let unit = emit(&groups[0], &properties, &mut FilenameAllocator::new());

	assert_eq!(unit.filename, "Example_App_Secrets.g.cs");
	assert_eq!(
		unit.text,
		"// <auto-generated />\n#nullable enable\n\nnamespace Example.App\n{\n    partial struct \
		 Secrets\n    {\n        public static partial string Key() => @\"s3cr\\et\";\n\n        \
		 public static partial string Vector() => default!;\n    }\n}\n"
	);
}

#[test]
fn emit_global_namespace_has_no_wrapper() {
	let container = ContainerId::new("", "Globals", ContainerKind::Reference);
	let candidate = CandidateDeclaration::property(container, "Name", "string")
		.with_accessibility(Accessibility::Internal);
	let output = generate(Some("Name=x"), &vec![candidate]);

	assert_eq!(output.units.len(), 1);
	assert_eq!(output.units[0].filename, "Globals.g.cs");
	assert_eq!(
		output.units[0].text,
		"// <auto-generated />\n#nullable enable\n\npartial class Globals\n{\n    internal static \
		 partial string Name => @\"x\";\n}\n"
	);
}

#[rstest]
#[case(Accessibility::Public, "public")]
#[case(Accessibility::Internal, "internal")]
#[case(Accessibility::Protected, "protected")]
#[case(Accessibility::Private, "private")]
#[case(Accessibility::ProtectedInternal, "protected internal")]
#[case(Accessibility::PrivateProtected, "private protected")]
fn accessibility_is_preserved(#[case] accessibility: Accessibility, #[case] keyword: &str) {
	let candidate = CandidateDeclaration::property(variants_container(), "Flag", "bool")
		.with_accessibility(accessibility);
	let output = generate(Some("Flag=false"), &vec![candidate]);

	let expected = format!("        {keyword} static partial bool Flag => false;\n");
	assert!(output.units[0].text.contains(&expected));
}

#[test]
fn generate_round_trip_in_discovery_order() {
	let container = ContainerId::new("Sample", "Build", ContainerKind::Reference);
	let declarations = vec![
		CandidateDeclaration::property(container.clone(), "A", "string"),
		CandidateDeclaration::property(container, "B", "int"),
	];
	let output = generate(Some("A=x,B=5"), &declarations);

	assert!(output.diagnostics.is_empty());
	assert_eq!(output.units.len(), 1);
	let text = &output.units[0].text;
	let a = text.find(r#"public static partial string A => @"x";"#);
	let b = text.find("public static partial int B => 5;");
	assert!(a.is_some() && b.is_some());
	assert!(a < b);
}

#[test]
fn missing_key_renders_default_placeholder() {
	let output = generate(None, &variants_candidates());
	let text = &output.units[0].text;

	assert_eq!(text.matches(DEFAULT_PLACEHOLDER).count(), 4);
	assert!(text.contains("public static partial int Code => default!;"));
}

#[test]
fn candidates_sharing_a_key_read_the_same_value() {
	let container = variants_container();
	let declarations = vec![
		CandidateDeclaration::property(container.clone(), "First", "string").with_key("Shared"),
		CandidateDeclaration::method(container.clone(), "Second", "string?").with_key("Shared"),
		CandidateDeclaration::property(container, "Shared", "string"),
	];
	let output = generate(Some("Shared=value"), &declarations);
	let text = &output.units[0].text;

	assert_eq!(text.matches(r#"@"value""#).count(), 3);
}

#[test]
fn invalid_declarations_do_not_block_valid_ones() {
	let mut declarations = vec![non_static_candidate()];
	declarations.extend(variants_candidates());
	declarations.push(double_candidate());
	declarations.extend(secrets_candidates());

	let output = generate(Some("Flavor=Debug"), &declarations);

	assert_eq!(output.units.len(), 2);
	assert_eq!(output.units[0].filename, "Develop_Variants.g.cs");
	assert_eq!(output.units[1].filename, "Example_App_Secrets.g.cs");
	assert!(!output.units[0].text.contains("Instance"));
	assert!(!output.units[0].text.contains("Ratio"));

	let kinds = output
		.diagnostics
		.iter()
		.map(|diagnostic| diagnostic.kind)
		.collect::<Vec<_>>();
	assert_eq!(
		kinds,
		vec![DiagnosticKind::InvalidShape, DiagnosticKind::UnsupportedType]
	);
}

#[test]
fn only_diagnostics_when_every_candidate_is_invalid() {
	let output = generate(Some("a=b"), &vec![non_static_candidate(), double_candidate()]);
	assert!(output.units.is_empty());
	assert_eq!(output.diagnostics.len(), 2);
	assert!(output.has_diagnostics());
}

#[test]
fn colliding_filenames_are_disambiguated() {
	let declarations = vec![
		CandidateDeclaration::property(
			ContainerId::new("A_B", "C", ContainerKind::Reference),
			"X",
			"int",
		),
		CandidateDeclaration::property(
			ContainerId::new("A.B", "C", ContainerKind::Reference),
			"Y",
			"int",
		),
		CandidateDeclaration::property(
			ContainerId::new("A", "B_C", ContainerKind::Reference),
			"Z",
			"int",
		),
	];
	let output = generate(None, &declarations);
	let filenames = output
		.units
		.iter()
		.map(|unit| unit.filename.as_str())
		.collect::<Vec<_>>();

	assert_eq!(filenames, vec!["A_B_C.g.cs", "A_B_C.2.g.cs", "A_B_C.3.g.cs"]);
}

#[test]
fn emit_shares_filename_allocation_with_generator() {
	let declarations = vec![
		CandidateDeclaration::property(
			ContainerId::new("A_B", "C", ContainerKind::Reference),
			"X",
			"int",
		),
		CandidateDeclaration::property(
			ContainerId::new("A.B", "C", ContainerKind::Reference),
			"Y",
			"int",
		),
	];
	let properties = resolve(Some("X=1,Y=2"));
	let groups = group_models(
		declarations
			.iter()
			.filter_map(|candidate| validate(candidate).ok()),
	);

	let mut allocator = FilenameAllocator::new();
	let units = groups
		.iter()
		.map(|group| emit(group, &properties, &mut allocator))
		.collect::<Vec<_>>();

	assert_eq!(units[0].filename, "A_B_C.g.cs");
	assert_eq!(units[1].filename, "A_B_C.2.g.cs");
	assert_eq!(units, generate(Some("X=1,Y=2"), &declarations).units);
}

#[test]
fn marker_attribute_is_emitted_first_when_enabled() -> BakeResult<()> {
	let generator = Generator::new(GenerateOptions {
		emit_marker_attribute: true,
		..GenerateOptions::default()
	});
	let output = generator.generate(None, &variants_candidates(), &CancellationToken::new())?;

	assert_eq!(output.units.len(), 2);
	assert_eq!(output.units[0], marker_attribute_unit("BakeProp"));
	assert_eq!(output.units[0].filename, "BuildPropertyAttribute.g.cs");
	assert!(output.units[0].text.contains("namespace BakeProp\n{\n"));
	assert!(
		output.units[0]
			.text
			.contains("    internal sealed class BuildPropertyAttribute : global::System.Attribute\n")
	);
	assert!(output.units[0].text.contains("        public string Key { get; }\n"));

	Ok(())
}

#[test]
fn cancelled_pass_returns_no_units() {
	let cancel = CancellationToken::new();
	let observer = cancel.clone();
	cancel.cancel();

	let result = Generator::default().generate(Some("Flavor=x"), &variants_candidates(), &observer);
	assert!(matches!(result, Err(BakeError::Cancelled)));
}

#[test]
fn cache_reuses_unaffected_stages() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let cancel = CancellationToken::new();
	let declarations = variants_candidates();

	let first = generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 6 });

	let second = generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	assert_eq!(cache.stats(), CacheStats { hits: 6, misses: 6 });
	assert_eq!(second.units, first.units);

	// A key no member reads only re-resolves the properties.
	let third = generator.generate(Some("Flavor=Debug,Unrelated=1"), &declarations, &cancel)?;
	assert_eq!(cache.stats(), CacheStats { hits: 11, misses: 7 });
	assert_eq!(third.units, first.units);

	let fourth = generator.generate(Some("Flavor=Release"), &declarations, &cancel)?;
	assert_eq!(cache.stats(), CacheStats { hits: 15, misses: 9 });
	assert!(fourth.units[0].text.contains(r#"Flavor => @"Release";"#));

	Ok(())
}

#[test]
fn cache_evicts_entries_unused_by_the_latest_pass() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let cancel = CancellationToken::new();
	let container = ContainerId::new("Sample", "Build", ContainerKind::Reference);

	for line in 1..=200 {
		let declarations = vec![
			CandidateDeclaration::property(container.clone(), "A", "string").with_location(
				SourceLocation {
					file: PathBuf::from("Sample/Build.cs"),
					line: Some(line),
					column: None,
				},
			),
		];
		let raw = format!("A={line}");
		let output = generator.generate(Some(&raw), &declarations, &cancel)?;
		assert!(output.units[0].text.contains(&format!(r#"A => @"{line}";"#)));

		assert_eq!(
			cache.sizes(),
			CacheSizes {
				properties: 1,
				validations: 1,
				units: 1,
			}
		);
	}

	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 600 });

	Ok(())
}

#[test]
fn cache_keeps_entries_of_the_latest_pass() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let cancel = CancellationToken::new();
	let mut declarations = variants_candidates();
	declarations.extend(secrets_candidates());

	generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	let full = CacheSizes {
		properties: 1,
		validations: 6,
		units: 2,
	};
	assert_eq!(cache.sizes(), full);

	// Dropping a container evicts its validations and unit.
	generator.generate(Some("Flavor=Debug"), &declarations[..4], &cancel)?;
	assert_eq!(
		cache.sizes(),
		CacheSizes {
			properties: 1,
			validations: 4,
			units: 1,
		}
	);

	generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	assert_eq!(cache.sizes(), full);

	Ok(())
}

#[test]
fn cancelled_pass_leaves_cache_for_the_next_sweep() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let cancelled = CancellationToken::new();
	cancelled.cancel();

	let result = generator.generate(Some("Flavor=Old"), &variants_candidates(), &cancelled);
	assert!(matches!(result, Err(BakeError::Cancelled)));
	assert_eq!(cache.sizes().properties, 1);

	generator.generate(Some("Flavor=New"), &variants_candidates(), &CancellationToken::new())?;
	assert_eq!(
		cache.sizes(),
		CacheSizes {
			properties: 1,
			validations: 4,
			units: 1,
		}
	);

	Ok(())
}

#[test]
fn cache_clear_drops_entries_and_keeps_counters() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let cancel = CancellationToken::new();
	let declarations = variants_candidates();

	let first = generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	cache.clear();
	assert_eq!(cache.sizes(), CacheSizes::default());
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 6 });

	let second = generator.generate(Some("Flavor=Debug"), &declarations, &cancel)?;
	assert_eq!(second.units, first.units);
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 12 });

	Ok(())
}

#[test]
fn cache_is_shared_between_threads() -> BakeResult<()> {
	let cache = Arc::new(GenerationCache::new());
	let generator = Generator::default().with_cache(Arc::clone(&cache));
	let declarations = variants_candidates();
	let expected = generate(Some("Flavor=Debug"), &declarations);
	let generator = &generator;
	let declarations = &declarations;

	let outputs = std::thread::scope(|scope| {
		let handles = (0..4)
			.map(|_| {
				scope.spawn(move || {
					generator.generate(Some("Flavor=Debug"), declarations, &CancellationToken::new())
				})
			})
			.collect::<Vec<_>>();

		handles
			.into_iter()
			.map(|handle| handle.join().unwrap_or(Err(BakeError::Cancelled)))
			.collect::<Vec<_>>()
	});

	for output in outputs {
		assert_eq!(output?.units, expected.units);
	}

	Ok(())
}

#[test]
#[traced_test]
fn generation_pass_is_logged() {
	let output = generate(Some("Flavor=Debug"), &variants_candidates());
	assert_eq!(output.units.len(), 1);
	assert!(logs_contain("starting generation pass"));
	assert!(logs_contain("finished generation pass"));
}

#[test]
fn manifest_from_toml() -> BakeResult<()> {
	let content = r#"
[[container]]
namespace = "Develop"
name = "Variants"

[[container.member]]
name = "Flavor"
type = "string"
line = 8

[[container.member]]
name = "Key"
type = "string?"
key = "SecretKey"
shape = "method"

[[container.member]]
name = "Broken"
type = "string"
static = false
"#;
	let path = Path::new("declarations.toml");
	let manifest = DeclarationManifest::parse(content, ManifestFormat::Toml, path)?;
	let candidates = manifest.candidates();

	assert_eq!(manifest.len(), 3);
	assert_eq!(candidates[0].container, variants_container());
	assert_eq!(
		candidates[0].location,
		Some(SourceLocation {
			file: path.to_path_buf(),
			line: Some(8),
			column: None,
		})
	);
	assert_eq!(candidates[1].shape, MemberShape::Method { parameter_count: 0 });
	assert_eq!(candidates[1].key_override.as_deref(), Some("SecretKey"));
	assert!(!candidates[2].is_static);

	let output = generate(Some("Flavor=Debug,SecretKey=k"), &manifest);
	assert_eq!(output.units.len(), 1);
	assert!(output.units[0].text.contains(r#"string? Key() => @"k";"#));
	assert_eq!(output.diagnostics.len(), 1);
	assert_eq!(
		output.diagnostics[0].location.as_ref().map(|l| l.file.as_path()),
		Some(path)
	);

	Ok(())
}

#[rstest]
#[case::json(
	ManifestFormat::Json,
	r#"{"container":[{"namespace":"Example.App","name":"Secrets","kind":"value","file":"Secrets.cs","member":[{"name":"Vector","type":"string","accessibility":"internal"}]}]}"#
)]
#[case::yaml(
	ManifestFormat::Yaml,
	"container:\n  - namespace: Example.App\n    name: Secrets\n    kind: value\n    file: Secrets.cs\n    member:\n      - name: Vector\n        type: string\n        accessibility: internal\n"
)]
fn manifest_from_other_formats(
	#[case] format: ManifestFormat,
	#[case] content: &str,
) -> BakeResult<()> {
	let manifest = DeclarationManifest::parse(content, format, Path::new("declarations"))?;
	let candidates = manifest.candidates();

	assert_eq!(candidates.len(), 1);
	assert_eq!(candidates[0].container, secrets_container());
	assert_eq!(candidates[0].accessibility, Accessibility::Internal);
	assert_eq!(
		candidates[0].location.as_ref().map(|l| l.file.as_path()),
		Some(Path::new("Secrets.cs"))
	);

	Ok(())
}

#[test]
fn manifest_rejects_unknown_extension() {
	let result = ManifestFormat::from_path(Path::new("declarations.ini"));
	assert!(matches!(result, Err(BakeError::UnsupportedManifestFormat(ext)) if ext == "ini"));
}

#[test]
fn manifest_reports_parse_errors() {
	let result = DeclarationManifest::parse(
		"[[container]]\nname = \"X\"\nunexpected = 1\n",
		ManifestFormat::Toml,
		Path::new("broken.toml"),
	);
	assert!(matches!(result, Err(BakeError::ManifestParse { path, .. }) if path == "broken.toml"));
}

#[test]
fn manifest_loads_from_disk() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("declarations.yml");
	std::fs::write(
		&path,
		"container:\n  - name: Globals\n    member:\n      - name: Flag\n        type: bool\n",
	)?;

	let manifest = DeclarationManifest::load(&path)?;
	assert_eq!(manifest.path(), path.as_path());
	assert_eq!(manifest.candidates()[0].container.namespace, "");

	Ok(())
}

#[test]
fn config_discovery_and_options() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert!(BakeConfig::load(tmp.path())?.is_none());

	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/bakeprop.toml"),
		"properties = \"Flavor=Debug\"\ndeclarations = \"decl.toml\"\n\n[marker]\nemit = true\n",
	)?;

	let config = BakeConfig::load(tmp.path())?.ok_or("config not found")?;
	assert_eq!(config.properties.as_deref(), Some("Flavor=Debug"));
	assert_eq!(config.declarations.as_deref(), Some(Path::new("decl.toml")));
	assert_eq!(config.output_dir(tmp.path()), tmp.path().join("Generated"));

	let options = config.generate_options();
	assert!(options.emit_marker_attribute);
	assert_eq!(options.marker_namespace, "BakeProp");

	Ok(())
}

#[test]
fn config_prefers_root_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("bakeprop.toml"), "output = \"out\"\n")?;
	std::fs::write(tmp.path().join(".bakeprop.toml"), "output = \"other\"\n")?;

	assert_eq!(
		BakeConfig::resolve_path(tmp.path()),
		Some(tmp.path().join("bakeprop.toml"))
	);

	Ok(())
}

#[test]
fn config_reports_parse_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("bakeprop.toml"), "properties = [\n")?;

	let result = BakeConfig::load(tmp.path());
	assert!(matches!(result, Err(BakeError::ConfigParse(_))));

	Ok(())
}
