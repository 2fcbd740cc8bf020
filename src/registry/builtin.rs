//! Built-in templates embedded at compile time.

use crate::error::{Result, SproutError};
use crate::registry::assets::Collateral;
use crate::registry::license::License;
use crate::registry::manifest::RegistryManifest;
use crate::registry::template::Template;
use include_dir::{include_dir, Dir};
use std::collections::HashMap;

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Read-only view of every template, license and collateral file.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Registry {
    manifest: RegistryManifest,
    templates: Vec<Template>,
    licenses: HashMap<License, String>,
    collateral: Collateral,
}

impl Registry {
    /// Load the registry embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_dir(&TEMPLATES_DIR)
    }

    /// Load a registry from an embedded directory tree.
    pub fn from_dir(dir: &Dir<'_>) -> Result<Self> {
        let manifest: RegistryManifest = parse_yaml(dir, "registry.yml")?;

        let mut templates = Vec::with_capacity(manifest.templates.len());
        for id in &manifest.templates {
            let path = format!("projects/{}.yml", id);
            let template: Template = parse_yaml(dir, &path)?;
            if !template.name.eq_ignore_ascii_case(id) {
                return Err(SproutError::ConfigParseError {
                    path: path.into(),
                    message: format!("template declares name '{}', expected '{}'", template.name, id),
                });
            }
            templates.push(template);
        }

        let mut licenses = HashMap::new();
        for license in License::ALL {
            let path = format!("licenses/{}.txt", license.id());
            licenses.insert(license, read_text(dir, &path)?.to_string());
        }

        let collateral = Collateral {
            gitignore: read_text(dir, "files/gitignore")?.to_string(),
            dockerfile: read_text(dir, "files/Dockerfile")?.to_string(),
            compose: read_text(dir, "files/docker-compose.yml")?.to_string(),
            pre_commit: read_text(dir, "files/pre-commit-config.yaml")?.to_string(),
        };

        Self::from_parts(manifest, templates, licenses, collateral)
    }

    /// Assemble a registry from already-parsed pieces, validating templates.
    pub fn from_parts(
        manifest: RegistryManifest,
        templates: Vec<Template>,
        licenses: HashMap<License, String>,
        collateral: Collateral,
    ) -> Result<Self> {
        for template in &templates {
            template
                .validate()
                .map_err(|message| SproutError::ConfigParseError {
                    path: format!("projects/{}.yml", template.name).into(),
                    message,
                })?;
        }

        tracing::debug!("Loaded {} templates", templates.len());

        Ok(Self {
            manifest,
            templates,
            licenses,
            collateral,
        })
    }

    /// Find a template by id, ignoring case.
    pub fn lookup(&self, id: &str) -> Option<&Template> {
        let id = id.trim();
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(id))
    }

    /// Canonical template ids in listing order.
    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// All templates in listing order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Tools installed by `--dev`.
    pub fn dev_tools(&self) -> &[String] {
        &self.manifest.dev_tools
    }

    /// Unrendered body of a license.
    pub fn license_body(&self, license: License) -> &str {
        self.licenses
            .get(&license)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Ignore rules, Docker files and pre-commit config.
    pub fn collateral(&self) -> &Collateral {
        &self.collateral
    }

    /// Get the manifest.
    pub fn manifest(&self) -> &RegistryManifest {
        &self.manifest
    }
}

fn read_text<'a>(dir: &'a Dir<'a>, path: &str) -> Result<&'a str> {
    let file = dir
        .get_file(path)
        .ok_or_else(|| SproutError::ConfigParseError {
            path: format!("templates/{}", path).into(),
            message: "file is missing from the embedded registry".to_string(),
        })?;

    file.contents_utf8()
        .ok_or_else(|| SproutError::ConfigParseError {
            path: format!("templates/{}", path).into(),
            message: "Invalid UTF-8".to_string(),
        })
}

fn parse_yaml<'a, T: serde::de::DeserializeOwned>(dir: &'a Dir<'a>, path: &str) -> Result<T> {
    let content = read_text(dir, path)?;
    serde_yaml::from_str(content).map_err(|e| SproutError::ConfigParseError {
        path: format!("templates/{}", path).into(),
        message: e.to_string(),
    })
}
