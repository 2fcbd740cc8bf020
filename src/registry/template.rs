//! Template schema definitions.
//!
//! A template is an ordered list of directives. Each directive names a path
//! relative to the project root: a trailing `/` makes it a directory, anything
//! else is a file with optional content.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Content written for a file directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveContent {
    /// Raw text, written verbatim.
    Text(String),

    /// Lines joined with `\n` (no trailing newline).
    Lines(Vec<String>),
}

impl DirectiveContent {
    /// The bytes that end up on disk.
    pub fn render(&self) -> String {
        match self {
            DirectiveContent::Text(text) => text.clone(),
            DirectiveContent::Lines(lines) => lines.join("\n"),
        }
    }
}

/// One entry of a template: a directory or a file to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDirective {
    /// Path relative to the project root. Ends in `/` for directories.
    pub path: String,

    /// File content. Absent means an empty file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<DirectiveContent>,
}

impl TemplateDirective {
    /// A file directive.
    pub fn file(path: impl Into<String>, content: DirectiveContent) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
        }
    }

    /// A directory directive.
    pub fn dir(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        Self {
            path,
            content: None,
        }
    }

    /// Whether this directive creates a directory.
    pub fn is_dir(&self) -> bool {
        self.path.ends_with('/')
    }

    /// Text written for a file directive.
    pub fn rendered_content(&self) -> String {
        self.content
            .as_ref()
            .map(DirectiveContent::render)
            .unwrap_or_default()
    }

    /// Check that the directive stays inside the project root.
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = self.path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err("directive path is empty".to_string());
        }
        if self.path.starts_with('/') || self.path.starts_with('\\') {
            return Err(format!("'{}' is absolute", self.path));
        }

        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(format!("'{}' escapes the project root", self.path));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(format!("'{}' is absolute", self.path));
                }
            }
        }

        if self.is_dir() && self.content.is_some() {
            return Err(format!("directory '{}' cannot carry content", self.path));
        }
        Ok(())
    }
}

/// A project template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Template {
    /// Template id, unique within the registry.
    pub name: String,

    /// One-line summary shown when listing templates.
    #[serde(default)]
    pub description: String,

    /// Package manifest path relative to the root.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// File opened in the editor once the project is ready.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// Ordered directives.
    #[serde(rename = "files")]
    pub directives: Vec<TemplateDirective>,
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_entrypoint() -> String {
    "main.py".to_string()
}

impl Template {
    /// Validate every directive.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("template name is empty".to_string());
        }
        for directive in &self.directives {
            directive.validate()?;
        }
        Ok(())
    }

    /// Packages the template declares in its manifest directive.
    pub fn declared_packages(&self) -> Vec<String> {
        let manifest = self
            .directives
            .iter()
            .rev()
            .find(|d| !d.is_dir() && d.path == self.manifest);

        match manifest.and_then(|d| d.content.as_ref()) {
            Some(DirectiveContent::Lines(lines)) => lines
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            Some(DirectiveContent::Text(text)) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect(),
            None => Vec::new(),
        }
    }
}
