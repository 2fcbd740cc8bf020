//! Create a project from a [`ProjectRequest`].

use crate::error::{Result, SproutError};
use crate::pipeline::{Orchestrator, ProjectRequest};
use crate::ui::UserInterface;
use crate::vcs::{GitHubClient, GitHubToken, RemoteHost};

use super::dispatcher::{AppContext, Command, CommandResult};

/// Runs the full pipeline for one request.
pub struct CreateCommand<'c, 'a> {
    context: &'c AppContext<'a>,
    request: ProjectRequest,
}

impl<'c, 'a> CreateCommand<'c, 'a> {
    pub fn new(context: &'c AppContext<'a>, request: ProjectRequest) -> Self {
        Self { context, request }
    }

    pub fn request(&self) -> &ProjectRequest {
        &self.request
    }

    /// GitHub client authenticated from the configured environment variable.
    fn github_client(&self) -> Result<GitHubClient> {
        let github = &self.context.settings.github;
        let token = GitHubToken::from_env(&github.token_env)?;
        GitHubClient::new(&github.api_url, token)
    }
}

impl Command for CreateCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = self.context.registry;

        if let Err(err) = self.request.validate(registry) {
            if let SproutError::UnknownTemplate { name } = &err {
                ui.error(&format!("Unknown template '{}'", name));
                ui.message(&format!(
                    "Available templates: {}",
                    registry.template_ids().join(", ")
                ));
                return Ok(CommandResult::failure(1));
            }
            return Err(err);
        }

        let client = match self.request.options.remote {
            Some(_) => Some(self.github_client()?),
            None => None,
        };
        let host = client.as_ref().map(|c| c as &dyn RemoteHost);

        let report = Orchestrator::new(self.context.runner, registry, self.context.settings)
            .with_remote_host(host)
            .run(&self.request, ui)?;

        tracing::debug!(
            "Finished {} with {} stages",
            report.root.display(),
            report.stages.len()
        );
        Ok(CommandResult::success())
    }
}
