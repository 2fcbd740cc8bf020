//! External process execution and host detection.

pub mod command;
pub mod mock;
pub mod path;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult, Invocation, ProcessRunner, SystemRunner};
pub use mock::MockRunner;
pub use path::{find_on_path, parse_system_path, resolve_tool_path};
pub use platform::{detect_shell, is_ci, HostFamily};
