//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing the parsed flags to a command

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::Settings;
use crate::error::{Result, SproutError};
use crate::registry::Registry;
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

use super::create::CreateCommand;
use super::interactive::InteractiveCommand;
use super::list::ListCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Shared state every command runs against.
pub struct AppContext<'a> {
    /// Directory new projects are created in.
    pub working_dir: PathBuf,
    pub registry: &'a Registry,
    pub settings: &'a Settings,
    pub runner: &'a dyn ProcessRunner,
}

/// Dispatches the parsed command line to a command.
pub struct CommandDispatcher<'a> {
    context: AppContext<'a>,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(context: AppContext<'a>) -> Self {
        Self { context }
    }

    /// Directory new projects are created in.
    pub fn working_dir(&self) -> &Path {
        &self.context.working_dir
    }

    /// Dispatch and execute a command.
    ///
    /// `--list` wins over everything, then `--interactive`, then a plain
    /// create from flags.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if cli.list {
            return ListCommand::new(self.context.registry).execute(ui);
        }

        let request = if cli.interactive {
            InteractiveCommand::new(self.context.registry, cli).collect(ui, self.working_dir())?
        } else {
            cli.to_request(self.working_dir())
                .ok_or_else(|| SproutError::MissingInput {
                    what: "project_name".to_string(),
                })?
        };

        CreateCommand::new(&self.context, request).execute(ui)
    }
}
