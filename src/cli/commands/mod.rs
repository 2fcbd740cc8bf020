//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! [`CommandDispatcher`] routes the parsed flags to one of:
//! - [`list::ListCommand`] for `--list`
//! - [`interactive::InteractiveCommand`] to build a request from prompts
//! - [`create::CreateCommand`] to run the pipeline

pub mod create;
pub mod dispatcher;
pub mod interactive;
pub mod list;

pub use dispatcher::{AppContext, Command, CommandDispatcher, CommandResult};
