//! Pipeline stages and the plan built from a request.

use crate::registry::License;
use crate::vcs::Visibility;
use std::fmt;

use super::request::ProjectRequest;

/// What a stage failure does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and report the failure.
    Abort,
    /// Report a warning and continue with the next stage.
    Warn,
}

/// One step of project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Creating,
    Materializing,
    Provisioning,
    Installing,
    DevTooling,
    Dockerizing,
    VcsLocal,
    VcsRemote { visibility: Visibility },
    Licensing { license: License },
    EditorLaunch,
    Activating,
}

impl Stage {
    /// Stable stage name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Creating => "creating",
            Stage::Materializing => "materializing",
            Stage::Provisioning => "provisioning",
            Stage::Installing => "installing",
            Stage::DevTooling => "dev-tooling",
            Stage::Dockerizing => "dockerizing",
            Stage::VcsLocal => "vcs-local",
            Stage::VcsRemote { .. } => "vcs-remote",
            Stage::Licensing { .. } => "licensing",
            Stage::EditorLaunch => "editor-launch",
            Stage::Activating => "activating",
        }
    }

    /// Spinner text while the stage runs.
    pub fn description(&self) -> String {
        match self {
            Stage::Creating => "Creating project directory".to_string(),
            Stage::Materializing => "Writing template files".to_string(),
            Stage::Provisioning => "Creating virtual environment".to_string(),
            Stage::Installing => "Installing packages".to_string(),
            Stage::DevTooling => "Installing developer tools".to_string(),
            Stage::Dockerizing => "Writing Docker files".to_string(),
            Stage::VcsLocal => "Initializing git repository".to_string(),
            Stage::VcsRemote { visibility } => {
                format!("Publishing {} GitHub repository", visibility)
            }
            Stage::Licensing { license } => format!("Writing {} license", license),
            Stage::EditorLaunch => "Opening editor".to_string(),
            Stage::Activating => "Activating environment".to_string(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        match self {
            Stage::Creating
            | Stage::Materializing
            | Stage::Installing
            | Stage::DevTooling
            | Stage::VcsRemote { .. } => FailurePolicy::Abort,
            Stage::Provisioning
            | Stage::Dockerizing
            | Stage::VcsLocal
            | Stage::Licensing { .. }
            | Stage::EditorLaunch
            | Stage::Activating => FailurePolicy::Warn,
        }
    }

    /// Stage that must have succeeded for this one to run.
    pub fn depends_on(&self) -> Option<Stage> {
        match self {
            Stage::VcsRemote { .. } => Some(Stage::VcsLocal),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the ordered stage list for `request`.
pub fn plan(request: &ProjectRequest) -> Vec<Stage> {
    let options = &request.options;
    let mut stages = vec![
        Stage::Creating,
        Stage::Materializing,
        Stage::Provisioning,
        Stage::Installing,
    ];

    if options.install_dev_tools {
        stages.push(Stage::DevTooling);
    }
    if options.docker {
        stages.push(Stage::Dockerizing);
    }
    if options.init_git || options.remote.is_some() {
        stages.push(Stage::VcsLocal);
    }
    if let Some(remote) = options.remote {
        stages.push(Stage::VcsRemote {
            visibility: remote.visibility,
        });
    }
    if let Some(license) = request.license {
        stages.push(Stage::Licensing { license });
    }
    if options.open_editor {
        stages.push(Stage::EditorLaunch);
    }
    if options.activate_env {
        stages.push(Stage::Activating);
    }

    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::request::{Options, Remote};

    fn names(stages: &[Stage]) -> Vec<&'static str> {
        stages.iter().map(Stage::name).collect()
    }

    #[test]
    fn default_request_plan() {
        let request = ProjectRequest::new("demo", "basic");
        assert_eq!(
            names(&plan(&request)),
            vec![
                "creating",
                "materializing",
                "provisioning",
                "installing",
                "vcs-local",
                "licensing",
                "editor-launch"
            ]
        );
    }

    #[test]
    fn every_option_in_fixed_order() {
        let request = ProjectRequest::new("demo", "basic").with_options(Options {
            activate_env: true,
            install_dev_tools: true,
            docker: true,
            init_git: true,
            open_editor: true,
            remote: Some(Remote {
                visibility: Visibility::Private,
            }),
        });

        assert_eq!(
            names(&plan(&request)),
            vec![
                "creating",
                "materializing",
                "provisioning",
                "installing",
                "dev-tooling",
                "dockerizing",
                "vcs-local",
                "vcs-remote",
                "licensing",
                "editor-launch",
                "activating"
            ]
        );
    }

    #[test]
    fn minimal_plan_without_git_license_or_editor() {
        let request = ProjectRequest::new("demo", "basic")
            .with_license(None)
            .with_options(Options {
                init_git: false,
                open_editor: false,
                ..Default::default()
            });

        assert_eq!(
            names(&plan(&request)),
            vec!["creating", "materializing", "provisioning", "installing"]
        );
    }

    #[test]
    fn remote_forces_local_repository() {
        let request = ProjectRequest::new("demo", "basic").with_options(Options {
            init_git: false,
            remote: Some(Remote {
                visibility: Visibility::Public,
            }),
            ..Default::default()
        });

        let stages = plan(&request);
        assert!(stages.contains(&Stage::VcsLocal));
        assert!(stages.contains(&Stage::VcsRemote {
            visibility: Visibility::Public
        }));
    }

    #[test]
    fn policies_and_dependencies() {
        assert_eq!(Stage::Installing.policy(), FailurePolicy::Abort);
        assert_eq!(Stage::Provisioning.policy(), FailurePolicy::Warn);
        assert_eq!(Stage::VcsLocal.policy(), FailurePolicy::Warn);
        let remote = Stage::VcsRemote {
            visibility: Visibility::Public,
        };
        assert_eq!(remote.policy(), FailurePolicy::Abort);
        assert_eq!(remote.depends_on(), Some(Stage::VcsLocal));
        assert_eq!(Stage::Licensing { license: License::Mit }.depends_on(), None);
    }
}
