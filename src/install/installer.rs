//! Package installation into a project environment.

use crate::config::ManifestMode;
use crate::environment::EnvironmentHandle;
use crate::error::{Result, SproutError};
use crate::shell::{Invocation, ProcessRunner};
use std::fs;
use std::path::Path;

use super::manifest::{merge_packages, read_manifest, write_manifest};

/// Pre-commit configuration file written by [`Installer::install_dev_tools`].
pub const PRE_COMMIT_CONFIG: &str = ".pre-commit-config.yaml";

/// What an installation run will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// No extras and an empty manifest.
    Nothing,
    /// `pip install -r <manifest>`.
    FromManifest,
    /// `pip install <packages>`, then rewrite the manifest.
    Packages(Vec<String>),
}

impl InstallAction {
    /// Decide from the packages on disk and the requested extras.
    pub fn plan(declared: &[String], extras: &[String], mode: ManifestMode) -> Self {
        if !extras.iter().any(|e| !e.trim().is_empty()) {
            if declared.is_empty() {
                InstallAction::Nothing
            } else {
                InstallAction::FromManifest
            }
        } else {
            InstallAction::Packages(merge_packages(declared, extras, mode))
        }
    }
}

/// Result of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// What ran.
    pub action: InstallAction,

    /// Packages now recorded in the manifest.
    pub manifest: Vec<String>,
}

impl InstallOutcome {
    /// One-line description for the status line.
    pub fn summary(&self, manifest_path: &str) -> String {
        match &self.action {
            InstallAction::Nothing => "No packages to install".to_string(),
            InstallAction::FromManifest => format!("Installed packages from {}", manifest_path),
            InstallAction::Packages(packages) => {
                format!("Installed {}", packages.join(", "))
            }
        }
    }
}

/// Installs packages with the environment's `pip`.
pub struct Installer<'a> {
    runner: &'a dyn ProcessRunner,
    mode: ManifestMode,
    timeout: Option<u64>,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    pub fn new(runner: &'a dyn ProcessRunner, mode: ManifestMode) -> Self {
        Self {
            runner,
            mode,
            timeout: None,
        }
    }

    /// Kill pip after `seconds`.
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds;
        self
    }

    /// Install the project's packages plus `extras`.
    ///
    /// `manifest` is relative to `root`. `declared` is used when the manifest
    /// file does not exist.
    pub fn install(
        &self,
        root: &Path,
        manifest: &str,
        declared: &[String],
        extras: &[String],
    ) -> Result<InstallOutcome> {
        let manifest_path = root.join(manifest);
        let on_disk = read_manifest(&manifest_path)?;
        let declared = if manifest_path.exists() {
            on_disk
        } else {
            declared.to_vec()
        };

        let action = InstallAction::plan(&declared, extras, self.mode);
        if action == InstallAction::Nothing {
            tracing::debug!("Nothing to install in {}", root.display());
            return Ok(InstallOutcome {
                action,
                manifest: declared,
            });
        }

        let env = EnvironmentHandle::locate(root)?;

        let recorded = match &action {
            InstallAction::Packages(packages) => {
                let mut args = vec!["install".to_string()];
                args.extend(packages.iter().cloned());
                self.pip(&env, root, args)?;

                write_manifest(&manifest_path, packages)?;
                tracing::info!("Recorded {} packages in {}", packages.len(), manifest);
                packages.clone()
            }
            _ => {
                self.pip(&env, root, ["install", "-r", manifest].map(String::from))?;
                declared
            }
        };

        Ok(InstallOutcome {
            action,
            manifest: recorded,
        })
    }

    /// Install developer tools and write the pre-commit configuration.
    pub fn install_dev_tools(
        &self,
        root: &Path,
        tools: &[String],
        pre_commit_config: &str,
    ) -> Result<()> {
        let env = EnvironmentHandle::locate(root)?;

        let mut args = vec!["install".to_string()];
        args.extend(tools.iter().cloned());
        self.pip(&env, root, args)?;

        let path = root.join(PRE_COMMIT_CONFIG);
        fs::write(&path, pre_commit_config).map_err(|e| SproutError::io(&path, e))
    }

    /// Register the pre-commit hooks with the project's repository.
    pub fn install_hooks(&self, root: &Path) -> Result<()> {
        let env = EnvironmentHandle::locate(root)?;
        let invocation = Invocation::new(env.tool("pre-commit").to_string_lossy())
            .arg("install")
            .cwd(root)
            .timeout(self.timeout);
        self.runner
            .run(&invocation)?
            .check(&invocation.display())?;
        Ok(())
    }

    fn pip<I>(&self, env: &EnvironmentHandle, root: &Path, args: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let invocation = Invocation::new(env.pip.to_string_lossy())
            .args(args)
            .cwd(root)
            .timeout(self.timeout);
        self.runner
            .run(&invocation)?
            .check(&invocation.display())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Project root with an environment that has a `pip`.
    fn project_with_env(manifest: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        let env = EnvironmentHandle::for_root(temp.path(), crate::shell::HostFamily::current());
        fs::create_dir_all(&env.bin_dir).unwrap();
        fs::write(&env.pip, "").unwrap();
        if let Some(content) = manifest {
            fs::write(temp.path().join("requirements.txt"), content).unwrap();
        }
        temp
    }

    #[test]
    fn plan_covers_every_case() {
        let flask = strings(&["flask"]);
        assert_eq!(
            InstallAction::plan(&[], &[], ManifestMode::Append),
            InstallAction::Nothing
        );
        assert_eq!(
            InstallAction::plan(&flask, &[], ManifestMode::Append),
            InstallAction::FromManifest
        );
        assert_eq!(
            InstallAction::plan(&flask, &strings(&["x"]), ManifestMode::Replace),
            InstallAction::Packages(strings(&["x"]))
        );
        assert_eq!(
            InstallAction::plan(&flask, &strings(&["x"]), ManifestMode::Append),
            InstallAction::Packages(strings(&["flask", "x"]))
        );
    }

    #[test]
    fn empty_manifest_and_no_extras_runs_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let runner = MockRunner::new();

        let outcome = Installer::new(&runner, ManifestMode::Append)
            .install(temp.path(), "requirements.txt", &[], &[])
            .unwrap();

        assert_eq!(outcome.action, InstallAction::Nothing);
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn no_extras_installs_from_manifest() {
        let temp = project_with_env(Some("flask"));
        let runner = MockRunner::new();

        Installer::new(&runner, ManifestMode::Append)
            .install(temp.path(), "requirements.txt", &[], &[])
            .unwrap();

        assert_eq!(runner.commands(), vec!["pip install -r requirements.txt"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("requirements.txt")).unwrap(),
            "flask"
        );
    }

    #[test]
    fn extras_replace_manifest() {
        let temp = project_with_env(Some("flask"));
        let runner = MockRunner::new();

        let outcome = Installer::new(&runner, ManifestMode::Replace)
            .install(temp.path(), "requirements.txt", &[], &strings(&["requests"]))
            .unwrap();

        assert_eq!(runner.commands(), vec!["pip install requests"]);
        assert_eq!(outcome.manifest, strings(&["requests"]));
        assert_eq!(
            fs::read_to_string(temp.path().join("requirements.txt")).unwrap(),
            "requests"
        );
    }

    #[test]
    fn extras_append_to_declared() {
        let temp = project_with_env(Some("flask"));
        let runner = MockRunner::new();

        Installer::new(&runner, ManifestMode::Append)
            .install(temp.path(), "requirements.txt", &[], &strings(&["requests"]))
            .unwrap();

        assert_eq!(runner.commands(), vec!["pip install flask requests"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("requirements.txt")).unwrap(),
            "flask\nrequests"
        );
    }

    #[test]
    fn missing_environment_is_fatal() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();

        let err = Installer::new(&runner, ManifestMode::Append)
            .install(temp.path(), "requirements.txt", &[], &strings(&["x"]))
            .unwrap_err();

        assert!(matches!(err, SproutError::EnvironmentMissing { .. }));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn pip_failure_leaves_manifest_untouched() {
        let temp = project_with_env(Some("flask"));
        let runner = MockRunner::new().fail_when("pip install", 1);

        let err = Installer::new(&runner, ManifestMode::Append)
            .install(temp.path(), "requirements.txt", &[], &strings(&["nope"]))
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("requirements.txt")).unwrap(),
            "flask"
        );
    }

    #[test]
    fn dev_tools_install_in_one_call_and_write_config() {
        let temp = project_with_env(None);
        let runner = MockRunner::new();
        let installer = Installer::new(&runner, ManifestMode::Append);

        installer
            .install_dev_tools(
                temp.path(),
                &strings(&["black", "flake8", "pytest", "pre-commit"]),
                "repos: []\n",
            )
            .unwrap();
        installer.install_hooks(temp.path()).unwrap();

        assert_eq!(
            runner.commands(),
            vec![
                "pip install black flake8 pytest pre-commit",
                "pre-commit install"
            ]
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(PRE_COMMIT_CONFIG)).unwrap(),
            "repos: []\n"
        );
    }
}
