//! `--interactive`: collect a request through prompts.
//!
//! Flags given alongside `-i` become the prompt defaults.

use std::path::Path;

use crate::cli::args::Cli;
use crate::error::{Result, SproutError};
use crate::pipeline::{validate_project_name, Options, ProjectRequest, Remote};
use crate::registry::{License, Registry};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};
use crate::vcs::Visibility;

/// Value of the license prompt meaning "no license".
const NO_LICENSE: &str = "none";

/// Builds a [`ProjectRequest`] from answers instead of flags.
pub struct InteractiveCommand<'a> {
    registry: &'a Registry,
    cli: &'a Cli,
}

impl<'a> InteractiveCommand<'a> {
    pub fn new(registry: &'a Registry, cli: &'a Cli) -> Self {
        Self { registry, cli }
    }

    /// Ask every question and assemble the request.
    pub fn collect(&self, ui: &mut dyn UserInterface, parent_dir: &Path) -> Result<ProjectRequest> {
        let name = ui
            .prompt(&self.name_prompt())?
            .as_string()
            .trim()
            .to_string();
        validate_project_name(&name)?;

        let template = ui.prompt(&self.template_prompt())?.as_string();
        let libraries = ui.prompt(&self.libraries_prompt())?.as_list();

        let license = match ui.prompt(&self.license_prompt())?.as_string().as_str() {
            NO_LICENSE => None,
            id => Some(License::from_id(id).ok_or_else(|| SproutError::MissingInput {
                what: format!("license '{}'", id),
            })?),
        };

        let features = ui.prompt(&self.features_prompt())?.as_list();
        let has = |feature: &str| features.iter().any(|f| f == feature);

        let remote = if has("github") {
            let private = ui
                .prompt(&self.private_prompt())?
                .as_bool()
                .unwrap_or(false);
            Some(Remote {
                visibility: if private {
                    Visibility::Private
                } else {
                    Visibility::Public
                },
            })
        } else {
            None
        };

        let options = Options {
            activate_env: has("activate"),
            install_dev_tools: has("dev"),
            docker: has("docker"),
            init_git: !self.cli.no_git,
            open_editor: !self.cli.no_editor,
            remote,
        };

        Ok(ProjectRequest::new(name, template)
            .with_packages(libraries)
            .with_license(license)
            .with_options(options)
            .in_dir(parent_dir))
    }

    fn name_prompt(&self) -> Prompt {
        Prompt {
            key: "project_name".to_string(),
            question: "Project name".to_string(),
            prompt_type: PromptType::Input,
            default: self.cli.project_name.clone(),
        }
    }

    fn template_prompt(&self) -> Prompt {
        let options = self
            .registry
            .templates()
            .iter()
            .map(|t| PromptOption {
                label: format!("{} - {}", t.name, t.description),
                value: t.name.clone(),
            })
            .collect();

        Prompt {
            key: "template".to_string(),
            question: "Template".to_string(),
            prompt_type: PromptType::Select { options },
            default: Some(self.cli.template.to_lowercase()),
        }
    }

    fn libraries_prompt(&self) -> Prompt {
        Prompt {
            key: "libraries".to_string(),
            question: "Extra packages (space or comma separated)".to_string(),
            prompt_type: PromptType::Input,
            default: Some(self.cli.libraries.join(" ")),
        }
    }

    fn license_prompt(&self) -> Prompt {
        let mut options: Vec<PromptOption> = License::ALL
            .iter()
            .map(|l| PromptOption {
                label: l.id().to_uppercase(),
                value: l.id().to_string(),
            })
            .collect();
        options.push(PromptOption {
            label: "No license".to_string(),
            value: NO_LICENSE.to_string(),
        });

        let default = match self.cli.selected_license() {
            Some(license) => license.id().to_string(),
            None => NO_LICENSE.to_string(),
        };

        Prompt {
            key: "license".to_string(),
            question: "License".to_string(),
            prompt_type: PromptType::Select { options },
            default: Some(default),
        }
    }

    fn features_prompt(&self) -> Prompt {
        let features = [
            ("dev", "Developer tools and pre-commit", self.cli.dev),
            ("docker", "Dockerfile and docker-compose.yml", self.cli.docker),
            ("github", "GitHub repository", self.cli.github),
            ("activate", "Open a shell in the environment", self.cli.activate),
        ];

        let default = features
            .iter()
            .filter(|(_, _, on)| *on)
            .map(|(value, _, _)| *value)
            .collect::<Vec<_>>()
            .join(",");
        let options = features
            .iter()
            .map(|(value, label, _)| PromptOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();

        Prompt {
            key: "features".to_string(),
            question: "Extras".to_string(),
            prompt_type: PromptType::MultiSelect { options },
            default: Some(default),
        }
    }

    fn private_prompt(&self) -> Prompt {
        Prompt {
            key: "private".to_string(),
            question: "Make the repository private?".to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(self.cli.private.to_string()),
        }
    }
}
