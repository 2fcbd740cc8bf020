//! Recording process runner for tests.
//!
//! `MockRunner` implements [`ProcessRunner`] without spawning anything. It
//! records every invocation, succeeds with empty output by default, and can
//! be told to fail commands, print canned stdout, hide tools, or perform a
//! filesystem side effect when a command runs.
//!
//! # Example
//!
//! ```
//! use sprout::shell::{Invocation, MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new().fail_when("git push", 128);
//!
//! assert!(runner.run(&Invocation::new("git").arg("init")).unwrap().success);
//! let push = runner.run(&Invocation::new("git").args(["push", "-u", "origin", "main"]));
//! assert_eq!(push.unwrap().exit_code, Some(128));
//! assert_eq!(runner.commands(), vec!["git init", "git push -u origin main"]);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SproutError};

use super::command::{CommandResult, Invocation, ProcessRunner};

/// Side effect run when a matching command executes.
pub type Effect = Box<dyn Fn(&Invocation)>;

/// Process runner that records invocations instead of running them.
#[derive(Default)]
pub struct MockRunner {
    invocations: RefCell<Vec<Invocation>>,
    failures: Vec<(String, i32, String)>,
    responses: Vec<(String, String)>,
    missing_tools: HashSet<String>,
    effects: Vec<(String, Effect)>,
}

impl MockRunner {
    /// Create a runner where every command succeeds and every tool exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose display line starts with `prefix` exit with `code`.
    pub fn fail_when(self, prefix: &str, code: i32) -> Self {
        self.fail_with_stderr(prefix, code, "")
    }

    /// Like [`fail_when`](Self::fail_when) with captured stderr.
    pub fn fail_with_stderr(mut self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.failures
            .push((prefix.to_string(), code, stderr.to_string()));
        self
    }

    /// Successful commands starting with `prefix` print `stdout`.
    pub fn respond_with(mut self, prefix: &str, stdout: &str) -> Self {
        self.responses.push((prefix.to_string(), stdout.to_string()));
        self
    }

    /// Pretend `tool` is not installed.
    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing_tools.insert(tool.to_string());
        self
    }

    /// Run `effect` whenever a command starting with `prefix` executes.
    pub fn on_command(mut self, prefix: &str, effect: impl Fn(&Invocation) + 'static) -> Self {
        self.effects.push((prefix.to_string(), Box::new(effect)));
        self
    }

    /// All recorded invocations, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Display lines of all recorded invocations.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::display)
            .collect()
    }

    /// Whether any recorded command starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }

    fn program_name(invocation: &Invocation) -> String {
        std::path::Path::new(&invocation.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| invocation.program.clone())
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        if self
            .missing_tools
            .contains(&Self::program_name(invocation))
        {
            return Err(SproutError::ToolMissing {
                tool: invocation.program.clone(),
            });
        }

        self.invocations.borrow_mut().push(invocation.clone());
        let display = invocation.display();

        for (prefix, effect) in &self.effects {
            if display.starts_with(prefix.as_str()) {
                effect(invocation);
            }
        }

        for (prefix, code, stderr) in &self.failures {
            if display.starts_with(prefix.as_str()) {
                return Ok(CommandResult::failure(
                    Some(*code),
                    String::new(),
                    stderr.clone(),
                    Duration::ZERO,
                ));
            }
        }

        let stdout = self
            .responses
            .iter()
            .find(|(prefix, _)| display.starts_with(prefix.as_str()))
            .map(|(_, stdout)| stdout.clone())
            .unwrap_or_default();
        Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
    }

    fn find_tool(&self, tool: &str) -> Option<PathBuf> {
        if self.missing_tools.contains(tool) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(tool))
        }
    }
}
