//! Settings schema.
//!
//! All fields are optional in the file; anything unknown is rejected so a
//! typo surfaces as a parse error instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// User settings for Sprout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Interpreter used to create environments. Searched on PATH when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Editor launched on the new project.
    pub editor: String,

    /// Author written into license files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// How the package manifest is rewritten after installing extras.
    pub manifest_mode: ManifestMode,

    /// Per-command timeout in seconds. Unset means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout: Option<u64>,

    /// Remote host settings.
    pub github: GitHubSettings,

    /// Local repository settings.
    pub git: GitSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python: None,
            editor: default_editor(),
            author: None,
            manifest_mode: ManifestMode::default(),
            command_timeout: None,
            github: GitHubSettings::default(),
            git: GitSettings::default(),
        }
    }
}

fn default_editor() -> String {
    "code".to_string()
}

/// Manifest rewrite policy when extra packages are installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestMode {
    /// Template packages followed by the extras.
    #[default]
    Append,
    /// Only the extras.
    Replace,
}

/// GitHub API and push settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubSettings {
    /// REST API base URL.
    pub api_url: String,

    /// SSH prefix used for the `origin` remote.
    pub ssh_host: String,

    /// Repository owner. Looked up from the API when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Environment variable holding the access token.
    pub token_env: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            ssh_host: "git@github.com".to_string(),
            username: None,
            token_env: "GITHUB_TOKEN".to_string(),
        }
    }
}

/// Local git settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Branch pushed to the remote.
    pub default_branch: String,

    /// Message of the first commit.
    pub commit_message: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            commit_message: "Initial commit".to_string(),
        }
    }
}
