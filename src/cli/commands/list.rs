//! `--list`: print the built-in templates.

use crate::error::Result;
use crate::registry::Registry;
use crate::ui::{SproutTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Lists template ids with their descriptions, in registry order.
pub struct ListCommand<'a> {
    registry: &'a Registry,
}

impl<'a> ListCommand<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let theme = SproutTheme::detect();
        let width = self
            .registry
            .template_ids()
            .iter()
            .map(|id| id.len())
            .max()
            .unwrap_or(0);

        ui.message(&format!("  {}", theme.header.apply_to("Templates:")));
        for template in self.registry.templates() {
            let padded = format!("{:<width$}", template.name, width = width);
            ui.message(&format!(
                "    {}  {}",
                theme.highlight.apply_to(padded),
                theme.dim.apply_to(&template.description)
            ));
        }

        Ok(CommandResult::success())
    }
}
