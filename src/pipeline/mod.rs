//! Project creation pipeline.
//!
//! A [`ProjectRequest`] is validated, turned into an ordered list of
//! [`Stage`]s by [`plan`], then run by the [`Orchestrator`]. Each stage
//! either aborts the run or downgrades its failure to a warning; see
//! [`Stage::policy`].

pub mod orchestrator;
pub mod request;
pub mod stage;

pub use orchestrator::{activation_hint, Orchestrator, RunReport, StageReport, StageStatus};
pub use request::{validate_project_name, Options, ProjectRequest, Remote};
pub use stage::{plan, FailurePolicy, Stage};
