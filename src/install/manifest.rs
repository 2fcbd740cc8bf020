//! Package manifest (`requirements.txt`) reading and reconciliation.

use crate::config::ManifestMode;
use crate::error::{Result, SproutError};
use std::fs;
use std::path::Path;

/// Package names from manifest text. Blank lines and comments are skipped.
pub fn parse_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read a manifest from disk. A missing file has no packages.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_manifest(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(SproutError::io(path, e)),
    }
}

/// Write `packages` one per line, without a trailing newline.
pub fn write_manifest(path: &Path, packages: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SproutError::io(parent, e))?;
    }
    fs::write(path, packages.join("\n")).map_err(|e| SproutError::io(path, e))
}

/// Drop repeated names, keeping the first occurrence.
pub fn dedup_preserving_order<I, S>(packages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    packages
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty() && seen.insert(p.clone()))
        .collect()
}

/// The package set installed, and recorded, for a run with extras.
pub fn merge_packages(declared: &[String], extras: &[String], mode: ManifestMode) -> Vec<String> {
    match mode {
        ManifestMode::Replace => dedup_preserving_order(extras),
        ManifestMode::Append => dedup_preserving_order(declared.iter().chain(extras)),
    }
}
