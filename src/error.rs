//! Error types for Sprout operations.
//!
//! This module defines [`SproutError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Validation errors are raised before anything touches the disk
//! - Process and I/O errors carry the command or path that caused them
//! - [`SproutError::StageFailed`] wraps the cause of an aborted request
//! - Use `anyhow::Error` (via `SproutError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Sprout operations.
#[derive(Debug, Error)]
pub enum SproutError {
    /// Project name is not usable as a single directory name.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Referenced template does not exist.
    #[error("Unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Required input was not provided.
    #[error("Missing required input: {what}")]
    MissingInput { what: String },

    /// A credential needed for a requested stage is not set.
    #[error("Missing credential: set the {env_var} environment variable")]
    MissingCredential { env_var: String },

    /// Failed to parse a settings or template file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A required external executable is not installed.
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolMissing { tool: String },

    /// Filesystem operation failed on a specific path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External command exceeded its time budget and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// The target path exists but is not a directory.
    #[error("{path} exists and is not a directory")]
    TargetNotDirectory { path: PathBuf },

    /// Package installation was attempted without a usable environment.
    #[error("Virtual environment not found at {path}")]
    EnvironmentMissing { path: PathBuf },

    /// The remote repository already exists.
    #[error("Repository '{name}' already exists on the remote host")]
    RemoteConflict { name: String },

    /// The remote host rejected the credential.
    #[error("Remote host rejected the credential (HTTP {status})")]
    RemoteAuth { status: u16 },

    /// The remote host returned an unexpected status.
    #[error("Remote host returned HTTP {status}: {message}")]
    RemoteApi { status: u16, message: String },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A stage could not run because a stage it depends on failed.
    #[error("'{stage}' skipped because '{dependency}' failed")]
    DependencyFailed { stage: String, dependency: String },

    /// A pipeline stage failed and aborted the request.
    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: Box<SproutError>,
    },

    /// IO error wrapper for errors without a known path.
    #[error("IO error: {0}")]
    StdIo(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SproutError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised before any side effect took place.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidProjectName { .. }
                | Self::UnknownTemplate { .. }
                | Self::MissingInput { .. }
                | Self::MissingCredential { .. }
        )
    }

    /// Process exit code for this error.
    ///
    /// A failed child process propagates its own non-zero code; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StageFailed { source, .. } => source.exit_code(),
            Self::CommandFailed {
                code: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            _ => 1,
        }
    }
}

/// Result type alias for Sprout operations.
pub type Result<T> = std::result::Result<T, SproutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_project_name_displays_name_and_reason() {
        let err = SproutError::InvalidProjectName {
            name: "a/b".into(),
            reason: "contains a path separator".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a/b"));
        assert!(msg.contains("path separator"));
    }

    #[test]
    fn unknown_template_displays_name() {
        let err = SproutError::UnknownTemplate {
            name: "nonexistent".into(),
        };
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn io_error_displays_path() {
        let err = SproutError::io(
            "/tmp/proj/main.py",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/proj/main.py"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SproutError::CommandFailed {
            command: "pip install flask".into(),
            code: Some(1),
            stderr: String::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pip install flask"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(SproutError::UnknownTemplate { name: "x".into() }.is_validation());
        assert!(SproutError::MissingCredential {
            env_var: "GITHUB_TOKEN".into()
        }
        .is_validation());
        assert!(!SproutError::ToolMissing { tool: "git".into() }.is_validation());
    }

    #[test]
    fn exit_code_propagates_child_code_through_stage_failure() {
        let err = SproutError::StageFailed {
            stage: "installing".into(),
            source: Box::new(SproutError::CommandFailed {
                command: "pip install nope".into(),
                code: Some(2),
                stderr: String::new(),
            }),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_code_defaults_to_one() {
        assert_eq!(
            SproutError::UnknownTemplate { name: "x".into() }.exit_code(),
            1
        );
        let killed = SproutError::CommandFailed {
            command: "git push".into(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(killed.exit_code(), 1);
    }

    #[test]
    fn std_io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SproutError = io_err.into();
        assert!(matches!(err, SproutError::StdIo(_)));
    }
}
