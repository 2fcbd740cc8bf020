//! Dependency installation and manifest reconciliation.

pub mod installer;
pub mod manifest;

pub use installer::{InstallAction, InstallOutcome, Installer, PRE_COMMIT_CONFIG};
pub use manifest::{dedup_preserving_order, merge_packages, parse_manifest, read_manifest, write_manifest};
