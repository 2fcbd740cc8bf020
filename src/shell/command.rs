//! External command execution.
//!
//! Every tool Sprout drives (python, pip, git, the editor, the user's shell)
//! goes through [`ProcessRunner`], so stages can be exercised against a
//! recording runner in tests.

use crate::error::{Result, SproutError};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::path::{find_on_path, parse_system_path};

/// How often a timed command is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn an unsuccessful result into [`SproutError::CommandFailed`].
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(SproutError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr (if false, inherits from parent).
    pub capture: bool,

    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

/// A program plus its arguments and execution options.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments passed verbatim (no shell involved).
    pub args: Vec<String>,

    /// Execution options.
    pub options: CommandOptions,
}

impl Invocation {
    /// Create a captured invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            options: CommandOptions {
                capture: true,
                ..Default::default()
            },
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`.
    pub fn cwd(mut self, dir: &Path) -> Self {
        self.options.cwd = Some(dir.to_path_buf());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.env.insert(key.into(), value.into());
        self
    }

    /// Hand the terminal to the child instead of capturing its output.
    pub fn inherit_stdio(mut self) -> Self {
        self.options.capture = false;
        self
    }

    /// Kill the child after `seconds`.
    pub fn timeout(mut self, seconds: Option<u64>) -> Self {
        self.options.timeout = seconds;
        self
    }

    /// Human-readable command line, used in status lines and errors.
    pub fn display(&self) -> String {
        let program = Path::new(&self.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.clone());
        if self.args.is_empty() {
            program
        } else {
            format!("{} {}", program, self.args.join(" "))
        }
    }
}

/// Runs external programs.
pub trait ProcessRunner {
    /// Execute an invocation and wait for it to finish.
    ///
    /// A program that cannot be found yields [`SproutError::ToolMissing`];
    /// a non-zero exit is reported in the returned [`CommandResult`].
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Locate a tool on the search path.
    fn find_tool(&self, tool: &str) -> Option<PathBuf>;
}

/// [`ProcessRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        execute(invocation)
    }

    fn find_tool(&self, tool: &str) -> Option<PathBuf> {
        find_on_path(tool, &parse_system_path())
    }
}

/// Execute an invocation as a child process.
pub fn execute(invocation: &Invocation) -> Result<CommandResult> {
    let start = Instant::now();
    let options = &invocation.options;
    let command_line = invocation.display();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Running: {}", command_line);

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SproutError::ToolMissing {
                tool: invocation.program.clone(),
            }
        } else {
            SproutError::CommandFailed {
                command: command_line.clone(),
                code: None,
                stderr: e.to_string(),
            }
        }
    })?;

    // Drain pipes on their own threads so a chatty child never blocks on a
    // full pipe while we wait for it.
    let stdout_handle = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = out.read_to_string(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = err.read_to_string(&mut buf);
            buf
        })
    });

    let status = match options.timeout {
        Some(seconds) => wait_with_timeout(&mut child, seconds, &command_line)?,
        None => child.wait().map_err(|e| SproutError::CommandFailed {
            command: command_line.clone(),
            code: None,
            stderr: e.to_string(),
        })?,
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    let duration = start.elapsed();
    tracing::debug!(
        "Finished: {} (exit {:?}, {}ms)",
        command_line,
        status.code(),
        duration.as_millis()
    );

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

fn wait_with_timeout(
    child: &mut Child,
    seconds: u64,
    command_line: &str,
) -> Result<std::process::ExitStatus> {
    let deadline = Instant::now() + Duration::from_secs(seconds);
    loop {
        let polled = child.try_wait().map_err(|e| SproutError::CommandFailed {
            command: command_line.to_string(),
            code: None,
            stderr: e.to_string(),
        })?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            tracing::warn!("Killing '{}' after {}s", command_line, seconds);
            let _ = child.kill();
            let _ = child.wait();
            return Err(SproutError::CommandTimedOut {
                command: command_line.to_string(),
                seconds,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
