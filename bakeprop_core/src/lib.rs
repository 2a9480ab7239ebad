//! `bakeprop_core` turns build-time configuration into compile-time
//! constants. Given declarations that are marked to be completed by
//! generation and a string of `key=value` build properties, it emits one
//! generated source unit per enclosing container with every configured value
//! baked in as a literal.
//!
//! ## Processing Pipeline
//!
//! ```text
//! raw "key=value,..."         declarations (DeclarationSource)
//!   → properties::resolve       → validate (model or diagnostic)
//!            \                      → group by (namespace, container)
//!             `----------------------→ emit (one unit per container)
//! ```
//!
//! Every stage is a pure function of its inputs. A rejected declaration
//! becomes a [`Diagnostic`] and never blocks the others; the only way a pass
//! stops early is through its [`CancellationToken`].
//!
//! ## Modules
//!
//! - [`properties`]: parsing of the raw property string into a
//!   [`PropertyMap`].
//! - [`validate`]: shape and type checks that turn a
//!   [`CandidateDeclaration`] into a [`ValidatedModel`].
//! - [`format`]: literal rendering for each supported value type.
//! - [`emit`]: filenames and text of generated units.
//! - [`manifest`]: a file-backed [`DeclarationSource`].
//! - [`config`]: project configuration loaded from `bakeprop.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use bakeprop_core::CandidateDeclaration;
//! use bakeprop_core::ContainerId;
//! use bakeprop_core::ContainerKind;
//! use bakeprop_core::generate;
//!
//! let container = ContainerId::new("Develop", "Variants", ContainerKind::Reference);
//! let declarations = vec![
//! 	CandidateDeclaration::property(container.clone(), "Flavor", "string"),
//! 	CandidateDeclaration::property(container, "Code", "int"),
//! ];
//!
//! let output = generate(Some("Flavor=Debug,Code=42"), &declarations);
//! assert_eq!(output.units.len(), 1);
//! assert_eq!(output.units[0].filename, "Develop_Variants.g.cs");
//! assert!(output.units[0].text.contains(r#"Flavor => @"Debug";"#));
//! ```

pub use cache::*;
pub use cancel::*;
pub use declaration::*;
pub use diagnostics::*;
pub use emit::GeneratedUnit;
pub use error::*;
pub use generator::*;
pub use group::*;
pub use properties::PropertyMap;
pub use validate::ValidatedModel;

mod cache;
mod cancel;
pub mod config;
mod declaration;
mod diagnostics;
pub mod emit;
#[allow(unused_assignments)]
mod error;
pub mod format;
mod generator;
mod group;
pub mod manifest;
pub mod properties;
pub mod validate;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
