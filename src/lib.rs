//! Sprout - scaffold Python projects in one step.
//!
//! Given a project name and a template, Sprout writes the project tree,
//! creates a `.venv`, installs packages, initializes git and can publish the
//! repository to GitHub.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - User settings loading
//! - [`environment`] - Virtual environment creation and lookup
//! - [`error`] - Error types and result aliases
//! - [`install`] - Package installation and manifest reconciliation
//! - [`materialize`] - Writing template files under the project root
//! - [`pipeline`] - Stage planning and orchestration
//! - [`registry`] - Embedded templates, licenses and collateral files
//! - [`shell`] - External command execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`vcs`] - Git and GitHub
//!
//! # Example
//!
//! ```
//! use sprout::pipeline::{plan, ProjectRequest};
//! use sprout::registry::Registry;
//!
//! let registry = Registry::builtin().unwrap();
//! let request = ProjectRequest::new("demo", "flask");
//! assert_eq!(request.validate(&registry).unwrap().entrypoint, "app.py");
//! assert_eq!(plan(&request)[0].name(), "creating");
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod install;
pub mod materialize;
pub mod pipeline;
pub mod registry;
pub mod shell;
pub mod ui;
pub mod vcs;

pub use error::{Result, SproutError};
