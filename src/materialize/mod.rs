//! Writes a template's directives under a project root.
//!
//! Every path is joined to the root; the process working directory is never
//! changed. Directories are created idempotently, files are created or
//! truncated. Nothing is rolled back on failure.

use crate::error::{Result, SproutError};
use crate::registry::Template;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether the project root was created by this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    /// The directory did not exist and was created.
    Created,
    /// The directory already existed; template files merge into it.
    Existing,
}

/// Paths written by [`materialize`], in directive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Directories ensured.
    pub directories: Vec<PathBuf>,

    /// Files written.
    pub files: Vec<PathBuf>,
}

/// Make sure `root` is a directory, creating it when absent.
pub fn prepare_root(root: &Path) -> Result<RootStatus> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(RootStatus::Existing),
        Ok(_) => Err(SproutError::TargetNotDirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(root).map_err(|e| SproutError::io(root, e))?;
            Ok(RootStatus::Created)
        }
        Err(e) => Err(SproutError::io(root, e)),
    }
}

/// Write every directive of `template` under `root`.
pub fn materialize(root: &Path, template: &Template) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();

    for directive in &template.directives {
        let relative = directive.path.trim_end_matches('/');
        if directive.is_dir() {
            let path = root.join(relative);
            fs::create_dir_all(&path).map_err(|e| SproutError::io(&path, e))?;
            report.directories.push(path);
        } else {
            let path = write_file(root, relative, &directive.rendered_content())?;
            report.files.push(path);
        }
    }

    tracing::debug!(
        "Materialized {} files and {} directories for '{}'",
        report.files.len(),
        report.directories.len(),
        template.name
    );
    Ok(report)
}

/// Create or truncate `root/relative` with `content`, creating parents.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SproutError::io(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| SproutError::io(&path, e))?;
    Ok(path)
}
