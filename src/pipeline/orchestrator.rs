//! Runs a stage plan against the filesystem and external tools.

use chrono::Datelike;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::environment::{EnvironmentHandle, Provisioner, ENV_DIR};
use crate::error::{Result, SproutError};
use crate::install::Installer;
use crate::materialize::{materialize, prepare_root, write_file, RootStatus};
use crate::registry::license::render as render_license;
use crate::registry::{Registry, Template};
use crate::shell::{detect_shell, HostFamily, Invocation, ProcessRunner};
use crate::ui::{SpinnerHandle, UserInterface};
use crate::vcs::{init_local, publish_remote, Git, RemoteHost};

use super::request::ProjectRequest;
use super::stage::{plan, FailurePolicy, Stage};

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// Ran cleanly.
    Completed,
    /// Ran, with something worth telling the user.
    Warned,
    /// Failed; the run continued because the stage only warns.
    Failed,
    /// Not run because a stage it depends on failed.
    Skipped,
}

/// Outcome of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub message: String,
}

/// Outcome of a run that reached the end of its plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Project root.
    pub root: PathBuf,

    /// Canonical id of the template used.
    pub template: String,

    /// One entry per planned stage, in order.
    pub stages: Vec<StageReport>,
}

impl RunReport {
    /// Status of the first stage called `name`.
    pub fn status_of(&self, name: &str) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage.name() == name)
            .map(|r| r.status)
    }

    /// Whether every stage completed without warnings.
    pub fn is_clean(&self) -> bool {
        self.stages
            .iter()
            .all(|r| r.status == StageStatus::Completed)
    }
}

/// Successful stage result.
enum Completion {
    Done(String),
    Caveat(String),
}

/// Executes [`ProjectRequest`]s.
pub struct Orchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    registry: &'a Registry,
    settings: &'a Settings,
    host: Option<&'a dyn RemoteHost>,
    year: i32,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        registry: &'a Registry,
        settings: &'a Settings,
    ) -> Self {
        Self {
            runner,
            registry,
            settings,
            host: None,
            year: chrono::Local::now().year(),
        }
    }

    /// Remote host used when a request asks for a remote repository.
    pub fn with_remote_host(mut self, host: Option<&'a dyn RemoteHost>) -> Self {
        self.host = host;
        self
    }

    /// Year written into license bodies.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Validate `request`, then run its plan.
    ///
    /// Validation errors are returned before anything touches the disk. An
    /// abort-class stage failure is returned as [`SproutError::StageFailed`];
    /// whatever earlier stages wrote stays on disk.
    pub fn run(&self, request: &ProjectRequest, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let template = self.validate(request)?;
        let root = request.root();
        let stages = plan(request);

        tracing::info!(
            "Creating '{}' from template '{}' in {}",
            request.name,
            template.name,
            root.display()
        );
        ui.show_header(&format!("{} ({})", request.name, template.name));

        let mut reports: Vec<StageReport> = Vec::with_capacity(stages.len());
        for stage in stages {
            if let Some(dependency) = failed_dependency(stage, &reports) {
                let message = format!("{} skipped: {} failed", stage.description(), dependency);
                ui.start_spinner(&stage.description())
                    .finish_skipped(&message);
                if stage.policy() == FailurePolicy::Abort {
                    return Err(SproutError::DependencyFailed {
                        stage: stage.name().to_string(),
                        dependency: dependency.name().to_string(),
                    });
                }
                reports.push(StageReport {
                    stage,
                    status: StageStatus::Skipped,
                    message,
                });
                continue;
            }

            tracing::debug!("Stage {} starting", stage);
            let mut status_line = StatusLine::start(ui, stage);
            let result = self.execute(stage, request, template, &root);

            let report = match result {
                Ok(Completion::Done(message)) => {
                    status_line.success(ui, &message);
                    StageReport {
                        stage,
                        status: StageStatus::Completed,
                        message,
                    }
                }
                Ok(Completion::Caveat(message)) => {
                    status_line.warning(ui, &message);
                    StageReport {
                        stage,
                        status: StageStatus::Warned,
                        message,
                    }
                }
                Err(err) => {
                    let message = format!("{}: {}", stage.description(), err);
                    match stage.policy() {
                        FailurePolicy::Abort => {
                            status_line.error(ui, &message);
                            show_command_output(ui, &err, true);
                            tracing::debug!("Stage {} aborted the run", stage);
                            return Err(SproutError::StageFailed {
                                stage: stage.name().to_string(),
                                source: Box::new(err),
                            });
                        }
                        FailurePolicy::Warn => {
                            status_line.warning(ui, &message);
                            let verbose = ui.output_mode().shows_command_output();
                            show_command_output(ui, &err, verbose);
                            tracing::warn!("Stage {} failed: {}", stage, err);
                            StageReport {
                                stage,
                                status: StageStatus::Failed,
                                message,
                            }
                        }
                    }
                }
            };
            reports.push(report);
        }

        ui.success(&format!("Created {} at {}", request.name, root.display()));
        if !request.options.activate_env {
            ui.show_hint(&activation_hint(&request.name, HostFamily::current()));
        }

        Ok(RunReport {
            root,
            template: template.name.clone(),
            stages: reports,
        })
    }

    fn validate(&self, request: &ProjectRequest) -> Result<&'a Template> {
        let template = request.validate(self.registry)?;
        if request.options.remote.is_some() && self.host.is_none() {
            return Err(SproutError::MissingCredential {
                env_var: self.settings.github.token_env.clone(),
            });
        }
        Ok(template)
    }

    fn installer(&self) -> Installer<'a> {
        Installer::new(self.runner, self.settings.manifest_mode)
            .with_timeout(self.settings.command_timeout)
    }

    fn git(&self, root: &Path) -> Git<'a> {
        Git::new(self.runner, root).with_timeout(self.settings.command_timeout)
    }

    fn execute(
        &self,
        stage: Stage,
        request: &ProjectRequest,
        template: &Template,
        root: &Path,
    ) -> Result<Completion> {
        let collateral = self.registry.collateral();
        let timeout = self.settings.command_timeout;

        match stage {
            Stage::Creating => match prepare_root(root)? {
                RootStatus::Created => Ok(Completion::Done(format!("Created {}", root.display()))),
                RootStatus::Existing => Ok(Completion::Caveat(format!(
                    "{} already exists, merging template files",
                    root.display()
                ))),
            },

            Stage::Materializing => {
                let report = materialize(root, template)?;
                Ok(Completion::Done(format!(
                    "Wrote {} files from '{}'",
                    report.files.len(),
                    template.name
                )))
            }

            Stage::Provisioning => {
                Provisioner::new(self.runner)
                    .with_python(self.settings.python.as_deref())
                    .with_timeout(timeout)
                    .provision(root)?;
                Ok(Completion::Done(format!("Created {}", ENV_DIR)))
            }

            Stage::Installing => {
                let outcome = self.installer().install(
                    root,
                    &template.manifest,
                    &template.declared_packages(),
                    &request.extra_packages,
                )?;
                Ok(Completion::Done(outcome.summary(&template.manifest)))
            }

            Stage::DevTooling => {
                let tools = self.registry.dev_tools();
                self.installer()
                    .install_dev_tools(root, tools, &collateral.pre_commit)?;
                Ok(Completion::Done(format!("Installed {}", tools.join(", "))))
            }

            Stage::Dockerizing => {
                write_file(
                    root,
                    "Dockerfile",
                    &collateral.render_dockerfile(&template.manifest, &template.entrypoint),
                )?;
                write_file(
                    root,
                    "docker-compose.yml",
                    &collateral.render_compose(&request.name),
                )?;
                Ok(Completion::Done(
                    "Wrote Dockerfile and docker-compose.yml".to_string(),
                ))
            }

            Stage::VcsLocal => {
                init_local(&self.git(root), &collateral.gitignore)?;
                if request.options.install_dev_tools {
                    if let Err(e) = self.installer().install_hooks(root) {
                        return Ok(Completion::Caveat(format!(
                            "Initialized git repository, pre-commit hooks not installed: {}",
                            e
                        )));
                    }
                }
                Ok(Completion::Done("Initialized git repository".to_string()))
            }

            Stage::VcsRemote { visibility } => {
                let host = self.host.ok_or_else(|| SproutError::MissingCredential {
                    env_var: self.settings.github.token_env.clone(),
                })?;
                let outcome = publish_remote(
                    &self.git(root),
                    host,
                    &request.name,
                    visibility,
                    &self.settings.github,
                    &self.settings.git,
                )?;
                if outcome.already_existed {
                    Ok(Completion::Caveat(format!(
                        "Repository already existed, pushed to {}",
                        outcome.remote_url
                    )))
                } else {
                    Ok(Completion::Done(format!("Pushed to {}", outcome.remote_url)))
                }
            }

            Stage::Licensing { license } => {
                let body = render_license(
                    self.registry.license_body(license),
                    self.year,
                    self.settings.author.as_deref(),
                );
                write_file(root, "LICENSE", &body)?;
                Ok(Completion::Done(format!("Wrote {} license", license)))
            }

            Stage::EditorLaunch => {
                let invocation = Invocation::new(self.settings.editor.as_str())
                    .args([".", template.entrypoint.as_str()])
                    .cwd(root)
                    .inherit_stdio();
                self.runner
                    .run(&invocation)?
                    .check(&invocation.display())?;
                Ok(Completion::Done(format!(
                    "Opened {} in {}",
                    template.entrypoint, self.settings.editor
                )))
            }

            Stage::Activating => {
                let env = EnvironmentHandle::locate(root)?;
                let invocation = activation_shell(&env, root)?;
                self.runner.run(&invocation)?;
                Ok(Completion::Done("Left the project shell".to_string()))
            }
        }
    }
}

/// First dependency of `stage` that did not complete.
fn failed_dependency(stage: Stage, reports: &[StageReport]) -> Option<Stage> {
    let dependency = stage.depends_on()?;
    reports
        .iter()
        .find(|r| r.stage == dependency)
        .filter(|r| matches!(r.status, StageStatus::Failed | StageStatus::Skipped))
        .map(|r| r.stage)
}

/// The user's shell with the project environment active.
fn activation_shell(env: &EnvironmentHandle, root: &Path) -> Result<Invocation> {
    let shell = detect_shell();
    let mut paths = vec![env.bin_dir.clone()];
    if let Some(existing) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&existing));
    }
    let path = std::env::join_paths(paths).map_err(|e| SproutError::Other(e.into()))?;

    Ok(Invocation::new(shell.to_string_lossy())
        .cwd(root)
        .env("VIRTUAL_ENV", env.root.to_string_lossy())
        .env("PATH", path.to_string_lossy())
        .inherit_stdio())
}

/// How to activate the environment by hand.
pub fn activation_hint(name: &str, family: HostFamily) -> String {
    let dir = shell_quote(name, family);
    match family {
        HostFamily::Windows => format!("cd {} && {}\\Scripts\\activate", dir, ENV_DIR),
        HostFamily::Unix => format!("cd {} && source {}/bin/activate", dir, ENV_DIR),
    }
}

/// Quote `word` for pasting into the family's shell when it needs it.
fn shell_quote(word: &str, family: HostFamily) -> String {
    let plain = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if plain {
        return word.to_string();
    }
    match family {
        // Names never contain `"`.
        HostFamily::Windows => format!("\"{}\"", word),
        HostFamily::Unix => format!("'{}'", word.replace('\'', "'\\''")),
    }
}

fn show_command_output(ui: &mut dyn UserInterface, err: &SproutError, show: bool) {
    if let SproutError::CommandFailed {
        command, stderr, ..
    } = err
    {
        if show && !stderr.is_empty() {
            ui.show_error_block(command, stderr, None);
        }
    }
}

/// Status line of a running stage.
///
/// Stages that hand the terminal to a child process print plain lines
/// instead of a spinner.
enum StatusLine {
    Spinner(Box<dyn SpinnerHandle>),
    Plain,
}

impl StatusLine {
    fn start(ui: &mut dyn UserInterface, stage: Stage) -> Self {
        match stage {
            Stage::EditorLaunch | Stage::Activating => {
                ui.message(&stage.description());
                StatusLine::Plain
            }
            _ => StatusLine::Spinner(ui.start_spinner(&stage.description())),
        }
    }

    fn success(&mut self, ui: &mut dyn UserInterface, msg: &str) {
        match self {
            StatusLine::Spinner(spinner) => spinner.finish_success(msg),
            StatusLine::Plain => ui.success(msg),
        }
    }

    fn warning(&mut self, ui: &mut dyn UserInterface, msg: &str) {
        match self {
            StatusLine::Spinner(spinner) => spinner.finish_warning(msg),
            StatusLine::Plain => ui.warning(msg),
        }
    }

    fn error(&mut self, ui: &mut dyn UserInterface, msg: &str) {
        match self {
            StatusLine::Spinner(spinner) => spinner.finish_error(msg),
            StatusLine::Plain => ui.error(msg),
        }
    }
}
