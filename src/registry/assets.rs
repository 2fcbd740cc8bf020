//! Collateral files written around a template: ignore rules, Docker
//! artifacts and the pre-commit configuration.

/// Fixed file bodies loaded from the embedded `files/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collateral {
    /// `.gitignore` body.
    pub gitignore: String,

    /// `Dockerfile` body with `{{manifest}}` and `{{entrypoint}}` slots.
    pub dockerfile: String,

    /// `docker-compose.yml` body with a `{{container_name}}` slot.
    pub compose: String,

    /// `.pre-commit-config.yaml` body.
    pub pre_commit: String,
}

impl Collateral {
    /// Dockerfile for a project whose manifest and entrypoint are given.
    pub fn render_dockerfile(&self, manifest: &str, entrypoint: &str) -> String {
        self.dockerfile
            .replace("{{manifest}}", manifest)
            .replace("{{entrypoint}}", entrypoint)
    }

    /// Compose file for `project_name`.
    pub fn render_compose(&self, project_name: &str) -> String {
        self.compose
            .replace("{{container_name}}", &container_name(project_name))
    }
}

/// Compose container name derived from a project name.
///
/// Lowercased; anything outside `[a-z0-9_.-]` becomes `_`.
pub fn container_name(project_name: &str) -> String {
    let name: String = project_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Docker requires the first character to be alphanumeric.
    match name.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => name,
        _ => format!("app{}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collateral() -> Collateral {
        Collateral {
            gitignore: ".venv/\n".into(),
            dockerfile: "RUN pip install -r {{manifest}}\nCMD [\"python\", \"{{entrypoint}}\"]\n"
                .into(),
            compose: "container_name: {{container_name}}\n".into(),
            pre_commit: "repos: []\n".into(),
        }
    }

    #[test]
    fn container_name_is_sanitized() {
        assert_eq!(container_name("My Project"), "my_project");
        assert_eq!(container_name("api-v2.1"), "api-v2.1");
        assert_eq!(container_name("_hidden"), "app_hidden");
    }

    #[test]
    fn dockerfile_uses_manifest_and_entrypoint() {
        let text = collateral().render_dockerfile("backend/requirements.txt", "backend/app.py");
        assert!(text.contains("-r backend/requirements.txt"));
        assert!(text.contains("\"backend/app.py\""));
    }

    #[test]
    fn compose_uses_project_name() {
        let text = collateral().render_compose("Shop");
        assert_eq!(text, "container_name: shop\n");
    }
}
