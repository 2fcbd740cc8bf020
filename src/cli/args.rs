//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::pipeline::{Options, ProjectRequest, Remote};
use crate::registry::License;
use crate::ui::OutputMode;
use crate::vcs::Visibility;

/// Sprout - scaffold a Python project with a virtual environment, packages and git.
#[derive(Debug, Parser)]
#[command(name = "sprout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the project directory to create
    #[arg(required_unless_present_any = ["interactive", "list"])]
    pub project_name: Option<String>,

    /// Extra packages to install and record in the manifest
    #[arg(short, long, num_args = 1.., value_name = "PKG")]
    pub libraries: Vec<String>,

    /// Project template (see --list)
    #[arg(short, long, default_value = "basic")]
    pub template: String,

    /// License to write (also accepted as `-lic`)
    #[arg(long, visible_alias = "lic", value_enum, default_value_t = License::Mit)]
    pub license: License,

    /// Do not write a LICENSE file
    #[arg(long)]
    pub no_license: bool,

    /// Open a shell with the environment activated when done
    #[arg(short, long)]
    pub activate: bool,

    /// Install developer tools and a pre-commit configuration
    #[arg(short, long)]
    pub dev: bool,

    /// Write a Dockerfile and docker-compose.yml
    #[arg(long)]
    pub docker: bool,

    /// Create a GitHub repository and push to it
    #[arg(long)]
    pub github: bool,

    /// Make the GitHub repository private
    #[arg(long, requires = "github")]
    pub private: bool,

    /// Ask for every option instead of reading flags
    #[arg(short, long)]
    pub interactive: bool,

    /// Skip git initialization
    #[arg(long)]
    pub no_git: bool,

    /// Do not open the editor
    #[arg(long)]
    pub no_editor: bool,

    /// List available templates and exit
    #[arg(long)]
    pub list: bool,

    /// Path to settings file (overrides ~/.sprout/config.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Single-dash spelling of `--license`.
const LICENSE_SHORTHAND: &str = "-lic";

/// Rewrite `-lic` and `-lic=<id>` to `--license`.
///
/// Clap would otherwise read `-lic` as `-l ic` and queue a package called
/// `ic`. Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix(LICENSE_SHORTHAND) {
                Some("") => OsString::from("--license"),
                Some(rest) if rest.starts_with('=') => OsString::from(format!("--license{}", rest)),
                _ => arg,
            }
        })
        .collect()
}

impl Cli {
    /// Parse `args` (program name first), accepting `-lic` for `--license`.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Output mode selected by `--verbose` / `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }

    /// License to write, `None` with `--no-license`.
    pub fn selected_license(&self) -> Option<License> {
        (!self.no_license).then_some(self.license)
    }

    /// Optional stages selected by flags.
    pub fn options(&self) -> Options {
        Options {
            activate_env: self.activate,
            install_dev_tools: self.dev,
            docker: self.docker,
            init_git: !self.no_git,
            open_editor: !self.no_editor,
            remote: self.github.then_some(Remote {
                visibility: if self.private {
                    Visibility::Private
                } else {
                    Visibility::Public
                },
            }),
        }
    }

    /// Request described by the flags, rooted in `parent_dir`.
    ///
    /// Returns `None` when no project name was given.
    pub fn to_request(&self, parent_dir: &Path) -> Option<ProjectRequest> {
        let name = self.project_name.as_ref()?;
        Some(
            ProjectRequest::new(name.as_str(), self.template.as_str())
                .with_packages(&self.libraries)
                .with_license(self.selected_license())
                .with_options(self.options())
                .in_dir(parent_dir),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sprout").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["demo"]);
        assert_eq!(cli.project_name.as_deref(), Some("demo"));
        assert_eq!(cli.template, "basic");
        assert_eq!(cli.selected_license(), Some(License::Mit));
        assert_eq!(cli.output_mode(), OutputMode::Normal);
        let options = cli.options();
        assert!(options.init_git && options.open_editor);
        assert!(options.remote.is_none());
    }

    #[test]
    fn libraries_take_several_values() {
        let cli = parse(&["demo", "-l", "requests", "rich", "-t", "cli"]);
        assert_eq!(cli.libraries, vec!["requests", "rich"]);
        assert_eq!(cli.template, "cli");
    }

    #[test]
    fn lic_is_an_alias_for_license() {
        let cli = parse(&["demo", "--lic", "gpl"]);
        assert_eq!(cli.license, License::Gpl);
        assert!(Cli::try_parse_from(["sprout", "demo", "--lic", "wtfpl"]).is_err());
    }

    #[test]
    fn single_dash_lic_selects_license() {
        let cli = Cli::try_parse_args(["sprout", "demo", "-lic=gpl"]).unwrap();
        assert_eq!(cli.license, License::Gpl);
        assert!(cli.libraries.is_empty());

        let cli = Cli::try_parse_args(["sprout", "demo", "-lic", "bsd", "-l", "rich"]).unwrap();
        assert_eq!(cli.license, License::Bsd);
        assert_eq!(cli.libraries, vec!["rich"]);
    }

    #[test]
    fn single_dash_lic_without_value_is_rejected() {
        assert!(Cli::try_parse_args(["sprout", "demo", "-t", "flask", "-lic"]).is_err());
    }

    #[test]
    fn normalize_leaves_other_arguments_alone() {
        let args = normalize_args(["sprout", "demo", "-l", "lice", "-lice", "--", "-lic"]);
        assert_eq!(
            args,
            ["sprout", "demo", "-l", "lice", "-lice", "--", "-lic"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn no_license_disables_licensing() {
        assert_eq!(parse(&["demo", "--no-license"]).selected_license(), None);
    }

    #[test]
    fn private_requires_github() {
        assert!(Cli::try_parse_from(["sprout", "demo", "--private"]).is_err());
        let cli = parse(&["demo", "--github", "--private"]);
        assert_eq!(
            cli.options().remote,
            Some(Remote {
                visibility: Visibility::Private
            })
        );
    }

    #[test]
    fn name_required_unless_interactive_or_list() {
        assert!(Cli::try_parse_from(["sprout"]).is_err());
        assert!(Cli::try_parse_from(["sprout", "-i"]).is_ok());
        assert!(Cli::try_parse_from(["sprout", "--list"]).is_ok());
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["demo", "-a", "-d", "-q"]);
        let options = cli.options();
        assert!(options.activate_env);
        assert!(options.install_dev_tools);
        assert_eq!(cli.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn to_request_carries_everything() {
        let cli = parse(&[
            "demo", "-l", "rich", "rich", "--docker", "--no-git", "--no-editor",
        ]);
        let request = cli.to_request(Path::new("/work")).unwrap();
        assert_eq!(request.root(), PathBuf::from("/work/demo"));
        assert_eq!(request.extra_packages, vec!["rich"]);
        assert!(request.options.docker);
        assert!(!request.options.init_git);
        assert!(!request.options.open_editor);
    }
}
