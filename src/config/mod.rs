//! User settings for Sprout.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use sprout::config::{load_settings, ConfigSource, ManifestMode};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("sprout.yml");
//! fs::write(&path, "manifest_mode: replace").unwrap();
//!
//! let settings = load_settings(&ConfigSource::Explicit(path)).unwrap();
//! assert_eq!(settings.manifest_mode, ManifestMode::Replace);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    load_settings, load_settings_file, parse_settings, user_config_path, ConfigSource,
    CONFIG_ENV_VAR,
};
pub use schema::{GitHubSettings, GitSettings, ManifestMode, Settings};
