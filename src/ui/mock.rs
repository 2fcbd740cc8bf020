//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use sprout::ui::{MockUI, SpinnerOutcome, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("template", "flask");
//!
//! let mut spinner = ui.start_spinner("Creating environment");
//! spinner.finish_success("Created .venv");
//! ui.success("Project ready");
//!
//! assert!(ui.has_success("ready"));
//! assert_eq!(
//!     ui.spinner_results(),
//!     vec![(SpinnerOutcome::Success, "Created .venv".to_string())]
//! );
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::{Result, SproutError};

use super::prompts::parse_bool;
use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// How a spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerOutcome {
    Success,
    Warning,
    Error,
    Skipped,
}

type SpinnerLog = Rc<RefCell<Vec<(SpinnerOutcome, String)>>>;

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
/// A prompt with no configured response and no default fails with
/// [`SproutError::MissingInput`], like the non-interactive UI.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
    spinner_log: SpinnerLog,
    error_blocks: Vec<(String, String, Option<String>)>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// After the queue is exhausted, falls back to `set_prompt_response`
    /// or the prompt default.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Finish outcome and message of every spinner, in finish order.
    pub fn spinner_results(&self) -> Vec<(SpinnerOutcome, String)> {
        self.spinner_log.borrow().clone()
    }

    /// Finish messages of spinners that ended with `outcome`.
    pub fn spinner_messages(&self, outcome: SpinnerOutcome) -> Vec<String> {
        self.spinner_log
            .borrow()
            .iter()
            .filter(|(o, _)| *o == outcome)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Get all captured error blocks as (command, output, hint).
    pub fn error_blocks(&self) -> &[(String, String, Option<String>)] {
        &self.error_blocks
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    fn typed(prompt: &Prompt, response: &str) -> PromptResult {
        match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_bool(response)),
            PromptType::MultiSelect { .. } => PromptResult::Strings(
                response
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => PromptResult::String(response.to_string()),
        }
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        if let Some(response) = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(|queue| queue.pop_front())
        {
            return Ok(Self::typed(prompt, &response));
        }

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(Self::typed(prompt, response));
        }

        match &prompt.default {
            Some(default) => Ok(Self::typed(prompt, default)),
            None => Err(SproutError::MissingInput {
                what: prompt.key.clone(),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new(Rc::clone(&self.spinner_log)))
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.error_blocks.push((
            command.to_string(),
            output.to_string(),
            hint.map(|h| h.to_string()),
        ));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that reports its finish into the owning [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    log: SpinnerLog,
    messages: Vec<String>,
}

impl MockSpinner {
    fn new(log: SpinnerLog) -> Self {
        Self {
            log,
            messages: Vec::new(),
        }
    }

    /// Messages set while spinning.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn record(&mut self, outcome: SpinnerOutcome, msg: &str) {
        self.log.borrow_mut().push((outcome, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.record(SpinnerOutcome::Success, msg);
    }

    fn finish_warning(&mut self, msg: &str) {
        self.record(SpinnerOutcome::Warning, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.record(SpinnerOutcome::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.record(SpinnerOutcome::Skipped, msg);
    }
}
