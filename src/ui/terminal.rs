//! Interactive terminal UI.
//!
//! Stage status goes to stdout; errors and the failed-command block go to
//! stderr so they survive `sprout ... > log`.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, PromptResult,
    SpinnerHandle, SproutTheme, UserInterface,
};

/// Output lines kept in a failed-command block. pip and git can print
/// hundreds; the cause is almost always at the end.
const ERROR_TAIL_LINES: usize = 20;

/// Narrowest rule drawn around a failed command.
const MIN_RULE_WIDTH: usize = 36;

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: SproutTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a terminal UI honoring `NO_COLOR`.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: SproutTheme::detect(),
            mode,
        }
    }

    fn status(&self, line: String) {
        if self.mode.shows_spinners() {
            writeln!(&self.out, "{}", line).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(&self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        self.status(self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        self.status(self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        writeln!(&self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.out)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(&self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            let arrow = self.theme.dim.apply_to("→");
            writeln!(&self.out, "  {} {}", arrow, self.theme.hint.apply_to(hint)).ok();
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let block = render_error_block(&self.theme, command, output, hint);
        write!(&self.err, "{}", block).ok();
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}

/// Box around a failed command and the tail of its output.
fn render_error_block(
    theme: &SproutTheme,
    command: &str,
    output: &str,
    hint: Option<&str>,
) -> String {
    let b = &theme.border;
    let width = (command.chars().count() + 2).max(MIN_RULE_WIDTH);
    let rule = |label: &str| {
        let fill = width.saturating_sub(label.chars().count() + 1);
        format!("{} {}", label, "─".repeat(fill))
    };

    let mut block = format!(
        "    {}\n    {} {}\n",
        b.apply_to(format!("┌─{}", rule(" Command"))),
        b.apply_to("│"),
        theme.command.apply_to(command)
    );

    let lines: Vec<&str> = output.lines().collect();
    if !lines.is_empty() {
        block.push_str(&format!("    {}\n", b.apply_to(format!("├─{}", rule(" Output")))));
        let skipped = lines.len().saturating_sub(ERROR_TAIL_LINES);
        if skipped > 0 {
            block.push_str(&format!(
                "    {} {}\n",
                b.apply_to("│"),
                theme.dim.apply_to(format!("… {} earlier lines", skipped))
            ));
        }
        for line in &lines[skipped..] {
            block.push_str(&format!("    {} {}\n", b.apply_to("│"), line));
        }
    }

    block.push_str(&format!("    {}\n", b.apply_to(format!("└{}", "─".repeat(width + 1)))));
    if let Some(h) = hint {
        block.push_str(&format!(
            "    {} {}\n",
            theme.hint.apply_to("Hint:"),
            theme.hint.apply_to(h)
        ));
    }
    block
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
