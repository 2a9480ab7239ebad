#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use bakeprop_core::properties::PROPERTIES_ENV_VAR;
use insta_cmd::get_cargo_bin;

pub const DECLARATIONS: &str = r#"[[container]]
namespace = "Develop"
name = "Variants"
file = "Develop/Variants.cs"

[[container.member]]
name = "Flavor"
type = "string"
line = 6

[[container.member]]
name = "Key"
type = "string?"
key = "SecretKey"
line = 8

[[container.member]]
name = "Code"
type = "int"
line = 10
"#;

pub const BROKEN_DECLARATIONS: &str = r#"[[container]]
namespace = "Develop"
name = "Variants"
file = "Develop/Variants.cs"

[[container.member]]
name = "Flavor"
type = "string"
line = 6

[[container.member]]
name = "Ratio"
type = "double"
line = 12
"#;

pub fn bakeprop_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("bakeprop"));
	cmd.env("NO_COLOR", "1").env_remove(PROPERTIES_ENV_VAR);
	cmd
}

/// Write a project with a config file pointing at `declarations`.
pub fn write_project(root: &Path, properties: &str, declarations: &str) -> std::io::Result<()> {
	std::fs::write(
		root.join("bakeprop.toml"),
		format!("properties = \"{properties}\"\ndeclarations = \"declarations.toml\"\n"),
	)?;
	std::fs::write(root.join("declarations.toml"), declarations)
}
