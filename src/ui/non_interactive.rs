//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, SproutError};

use super::{
    LineSpinner, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "SPROUT_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `SPROUT_PROMPT_<KEY>` variables, then from the
/// prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer(prompt: &Prompt, value: &str) -> PromptResult {
        match prompt.prompt_type {
            PromptType::MultiSelect { .. } => PromptResult::Strings(
                value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            PromptType::Confirm => PromptResult::Bool(super::prompts::parse_bool(value)),
            _ => PromptResult::String(value.to_string()),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            return Ok(Self::answer(prompt, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(Self::answer(prompt, default));
        }

        Err(SproutError::MissingInput {
            what: prompt.key.clone(),
        })
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(LineSpinner::new(self.mode.shows_spinners()))
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        eprintln!("    Command: {}", command);
        for line in output.lines() {
            eprintln!("    | {}", line);
        }
        if let Some(h) = hint {
            eprintln!("    Hint: {}", h);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
