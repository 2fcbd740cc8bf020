//! Virtual environment creation and lookup.

use crate::error::{Result, SproutError};
use crate::shell::{HostFamily, Invocation, ProcessRunner};
use std::path::{Path, PathBuf};

use super::layout::EnvLayout;

/// Environment directory name, relative to the project root.
pub const ENV_DIR: &str = ".venv";

/// Resolved locations inside a project's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHandle {
    /// Environment root (`<project>/.venv`).
    pub root: PathBuf,

    /// Executable directory (`bin` or `Scripts`).
    pub bin_dir: PathBuf,

    /// Package installer.
    pub pip: PathBuf,

    /// Environment interpreter.
    pub python: PathBuf,
}

impl EnvironmentHandle {
    /// Compute the handle for `project_root` on a given host family.
    ///
    /// Nothing is checked on disk.
    pub fn for_root(project_root: &Path, family: HostFamily) -> Self {
        let layout = EnvLayout::for_family(family);
        let root = project_root.join(ENV_DIR);
        let bin_dir = root.join(layout.bin_dir);
        Self {
            pip: bin_dir.join(layout.executable("pip")),
            python: bin_dir.join(layout.executable("python")),
            root,
            bin_dir,
        }
    }

    /// Rebuild the handle for an existing environment on this host.
    ///
    /// Fails with [`SproutError::EnvironmentMissing`] when the environment
    /// has no package installer.
    pub fn locate(project_root: &Path) -> Result<Self> {
        let handle = Self::for_root(project_root, HostFamily::current());
        if handle.is_usable() {
            Ok(handle)
        } else {
            Err(SproutError::EnvironmentMissing { path: handle.root })
        }
    }

    /// Whether the environment can install packages.
    pub fn is_usable(&self) -> bool {
        self.pip.is_file()
    }

    /// Executable named `tool` inside the environment.
    pub fn tool(&self, tool: &str) -> PathBuf {
        let layout = EnvLayout::for_family(HostFamily::current());
        self.bin_dir.join(layout.executable(tool))
    }
}

/// Creates virtual environments through the host interpreter.
pub struct Provisioner<'a> {
    runner: &'a dyn ProcessRunner,
    python: Option<&'a str>,
    family: HostFamily,
    timeout: Option<u64>,
}

impl<'a> Provisioner<'a> {
    /// A provisioner for the current host.
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self {
            runner,
            python: None,
            family: HostFamily::current(),
            timeout: None,
        }
    }

    /// Use this interpreter instead of searching PATH.
    pub fn with_python(mut self, python: Option<&'a str>) -> Self {
        self.python = python;
        self
    }

    /// Kill the interpreter after `seconds`.
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds;
        self
    }

    /// Pretend to run on another host family.
    pub fn with_family(mut self, family: HostFamily) -> Self {
        self.family = family;
        self
    }

    /// Run `<python> -m venv .venv` inside `root`.
    pub fn provision(&self, root: &Path) -> Result<EnvironmentHandle> {
        let python = self.resolve_interpreter()?;
        tracing::info!("Creating environment in {} with {}", root.display(), python);

        let invocation = Invocation::new(python)
            .args(["-m", "venv", ENV_DIR])
            .cwd(root)
            .timeout(self.timeout);
        self.runner
            .run(&invocation)?
            .check(&invocation.display())?;

        let handle = EnvironmentHandle::for_root(root, self.family);
        if !handle.is_usable() {
            tracing::warn!("{} has no package installer yet", handle.bin_dir.display());
        }
        Ok(handle)
    }

    /// The configured interpreter, or the first candidate found on PATH.
    pub fn resolve_interpreter(&self) -> Result<String> {
        if let Some(python) = self.python {
            return Ok(python.to_string());
        }

        let candidates = EnvLayout::for_family(self.family).python_candidates;
        candidates
            .iter()
            .find_map(|candidate| self.runner.find_tool(candidate))
            .map(|path| path.to_string_lossy().into_owned())
            .ok_or_else(|| SproutError::ToolMissing {
                tool: candidates.join(" or "),
            })
    }
}
