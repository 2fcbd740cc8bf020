//! Settings file discovery and loading.
//!
//! Lookup order, first hit wins:
//! 1. `--config <path>`
//! 2. `$SPROUT_CONFIG`
//! 3. `~/.sprout/config.yml`
//! 4. built-in defaults

use crate::config::schema::Settings;
use crate::error::{Result, SproutError};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "SPROUT_CONFIG";

/// Where settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named explicitly (flag or environment). Must exist.
    Explicit(PathBuf),
    /// The per-user file. Optional.
    UserGlobal(PathBuf),
    /// Nothing found; defaults apply.
    Defaults,
}

impl ConfigSource {
    /// Pick a source from the flag, the environment value and the home dir.
    pub fn resolve(
        flag: Option<&Path>,
        env_value: Option<String>,
        home: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = flag {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            return ConfigSource::Explicit(PathBuf::from(value));
        }
        match home {
            Some(home) => ConfigSource::UserGlobal(user_config_path(&home)),
            None => ConfigSource::Defaults,
        }
    }

    /// Resolve against the real process environment.
    pub fn discover(flag: Option<&Path>) -> Self {
        Self::resolve(
            flag,
            std::env::var(CONFIG_ENV_VAR).ok(),
            dirs::home_dir(),
        )
    }
}

/// `~/.sprout/config.yml` under `home`.
pub fn user_config_path(home: &Path) -> PathBuf {
    home.join(".sprout").join("config.yml")
}

/// Load settings from a resolved source.
///
/// # Errors
///
/// Returns `Io` if an explicit file cannot be read.
/// Returns `ConfigParseError` if the YAML is invalid or has unknown keys.
pub fn load_settings(source: &ConfigSource) -> Result<Settings> {
    match source {
        ConfigSource::Explicit(path) => load_settings_file(path),
        ConfigSource::UserGlobal(path) if path.exists() => load_settings_file(path),
        ConfigSource::UserGlobal(_) | ConfigSource::Defaults => Ok(Settings::default()),
    }
}

/// Load a single settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| SproutError::io(path, e))?;
    let settings = parse_settings(&content, path)?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse YAML content into [`Settings`].
///
/// An empty file yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| SproutError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
