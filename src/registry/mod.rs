//! Template registry for Sprout.
//!
//! Every static table the engine needs (project templates, license bodies,
//! ignore rules, Docker files, the pre-commit config and the dev-tool list)
//! is embedded in the binary and parsed once into a [`Registry`].
//!
//! # Example
//!
//! ```
//! use sprout::registry::Registry;
//!
//! let registry = Registry::builtin().unwrap();
//!
//! if let Some(template) = registry.lookup("Flask") {
//!     assert_eq!(template.name, "flask");
//! }
//! ```

pub mod assets;
pub mod builtin;
pub mod license;
pub mod manifest;
pub mod template;

// Re-exports
pub use assets::{container_name, Collateral};
pub use builtin::Registry;
pub use license::{License, DEFAULT_AUTHOR};
pub use manifest::RegistryManifest;
pub use template::{DirectiveContent, Template, TemplateDirective};
