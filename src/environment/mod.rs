//! Isolated Python environments.
//!
//! [`Provisioner`] creates `.venv` inside a project root; an
//! [`EnvironmentHandle`] tells later stages where the environment's `pip`
//! and `python` live on the current host.

pub mod layout;
pub mod provisioner;

pub use layout::EnvLayout;
pub use provisioner::{EnvironmentHandle, Provisioner, ENV_DIR};
