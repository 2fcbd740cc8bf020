//! Registry manifest definitions.
//!
//! `registry.yml` fixes the listing order of the built-in templates and the
//! tools installed by `--dev`.

use serde::{Deserialize, Serialize};

/// Registry manifest defining available templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryManifest {
    /// Manifest version.
    #[serde(default = "default_manifest_version")]
    pub version: u32,

    /// Template ids in listing order.
    #[serde(default)]
    pub templates: Vec<String>,

    /// Developer tools installed together.
    #[serde(default)]
    pub dev_tools: Vec<String>,
}

fn default_manifest_version() -> u32 {
    1
}
