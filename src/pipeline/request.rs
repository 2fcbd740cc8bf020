//! A validated request to scaffold one project.

use crate::error::{Result, SproutError};
use crate::install::dedup_preserving_order;
use crate::registry::{License, Registry, Template};
use crate::vcs::Visibility;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Remote repository requested with `--github`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remote {
    pub visibility: Visibility,
}

/// Optional stages selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Spawn a shell with the environment active once done.
    pub activate_env: bool,

    /// Install the dev-tool list and the pre-commit configuration.
    pub install_dev_tools: bool,

    /// Write `Dockerfile` and `docker-compose.yml`.
    pub docker: bool,

    /// Run `git init` and write the ignore rules.
    pub init_git: bool,

    /// Open the configured editor on the entrypoint.
    pub open_editor: bool,

    /// Create a remote repository and push to it.
    pub remote: Option<Remote>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            activate_env: false,
            install_dev_tools: false,
            docker: false,
            init_git: true,
            open_editor: true,
            remote: None,
        }
    }
}

/// Everything needed to scaffold one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Project name, used as the directory name.
    pub name: String,

    /// Template id as typed by the user.
    pub template_id: String,

    /// Extra packages, first-seen order, no duplicates.
    pub extra_packages: Vec<String>,

    /// License to write, if any.
    pub license: Option<License>,

    /// Optional stages.
    pub options: Options,

    /// Directory the project directory is created in.
    pub parent_dir: PathBuf,
}

impl ProjectRequest {
    /// A request for `name` from `template_id` with default options.
    pub fn new(name: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_id: template_id.into(),
            extra_packages: Vec::new(),
            license: Some(License::default()),
            options: Options::default(),
            parent_dir: PathBuf::from("."),
        }
    }

    /// Set the extra packages, dropping blanks and duplicates.
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_packages = dedup_preserving_order(packages);
        self
    }

    pub fn with_license(mut self, license: Option<License>) -> Self {
        self.license = license;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Create the project under `dir` instead of the working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parent_dir = dir.into();
        self
    }

    /// Project root on disk.
    pub fn root(&self) -> PathBuf {
        self.parent_dir.join(&self.name)
    }

    /// Check the name and resolve the template without touching the disk.
    pub fn validate<'r>(&self, registry: &'r Registry) -> Result<&'r Template> {
        validate_project_name(&self.name)?;
        registry
            .lookup(&self.template_id)
            .ok_or_else(|| SproutError::UnknownTemplate {
                name: self.template_id.clone(),
            })
    }
}

/// Characters no host accepts in a directory name.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^<>:"/\\|?*\x00-\x1F]+$"#).expect("NAME_REGEX must compile")
});

/// Device names Windows reserves, with or without an extension.
static RESERVED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(con|prn|aux|nul|com[0-9]|lpt[0-9])(\..*)?$")
        .expect("RESERVED_REGEX must compile")
});

/// A project name must be usable as one directory name on every host.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| SproutError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name != name.trim() {
        return Err(invalid("name has leading or trailing whitespace"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name refers to an existing directory"));
    }
    if !NAME_REGEX.is_match(name) {
        return Err(invalid(
            "name contains a path separator or a reserved character",
        ));
    }
    if name.ends_with('.') {
        return Err(invalid("name ends with a dot"));
    }
    if RESERVED_REGEX.is_match(name) {
        return Err(invalid("name is a reserved device name on Windows"));
    }
    Ok(())
}
