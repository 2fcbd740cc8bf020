//! Local git operations.

use crate::error::Result;
use crate::shell::{Invocation, ProcessRunner};
use std::path::{Path, PathBuf};

/// Runs `git` inside one repository root.
pub struct Git<'a> {
    runner: &'a dyn ProcessRunner,
    root: PathBuf,
    timeout: Option<u64>,
}

impl<'a> Git<'a> {
    /// Git commands for the repository at `root`.
    pub fn new(runner: &'a dyn ProcessRunner, root: &Path) -> Self {
        Self {
            runner,
            root: root.to_path_buf(),
            timeout: None,
        }
    }

    /// Kill git after `seconds`.
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds;
        self
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git <args>` and return trimmed stdout.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let invocation = Invocation::new("git")
            .args(args.iter().copied())
            .cwd(&self.root)
            .timeout(self.timeout);
        let result = self
            .runner
            .run(&invocation)?
            .check(&invocation.display())?;
        Ok(result.stdout.trim().to_string())
    }

    pub fn init(&self) -> Result<()> {
        self.run(&["init"]).map(drop)
    }

    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "."]).map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    /// Whether the working tree or index differs from `HEAD`.
    pub fn has_changes(&self) -> Result<bool> {
        Ok(!self.run(&["status", "--porcelain"])?.is_empty())
    }

    /// Whether a remote called `name` is configured.
    pub fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.run(&["remote"])?.lines().any(|line| line.trim() == name))
    }

    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url]).map(drop)
    }

    pub fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "set-url", name, url]).map(drop)
    }

    /// Rename the current branch, overwriting any existing one.
    pub fn rename_branch(&self, branch: &str) -> Result<()> {
        self.run(&["branch", "-M", branch]).map(drop)
    }

    /// Push `branch` and set it as upstream.
    pub fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch]).map(drop)
    }
}
