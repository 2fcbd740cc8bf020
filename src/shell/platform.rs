//! Host platform and shell detection.

use std::path::PathBuf;

/// Host families that differ in how executables are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFamily {
    /// Windows: `Scripts\` inside environments, `.exe` executables.
    Windows,
    /// Linux, macOS and other Unix-likes: `bin/`, no suffix.
    Unix,
}

impl HostFamily {
    /// The family of the host this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostFamily::Windows
        } else {
            HostFamily::Unix
        }
    }

    /// File name suffixes tried when resolving a bare tool name.
    pub fn executable_suffixes(&self) -> &'static [&'static str] {
        match self {
            HostFamily::Windows => &["", ".exe", ".cmd", ".bat"],
            HostFamily::Unix => &[""],
        }
    }
}

/// The user's login shell, falling back to the platform default.
pub fn detect_shell() -> PathBuf {
    shell_executable(
        HostFamily::current(),
        std::env::var("COMSPEC").ok(),
        std::env::var("SHELL").ok(),
    )
}

fn shell_executable(family: HostFamily, comspec: Option<String>, shell: Option<String>) -> PathBuf {
    let (configured, fallback) = match family {
        HostFamily::Windows => (comspec, "cmd.exe"),
        HostFamily::Unix => (shell, "/bin/sh"),
    };
    configured
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive output in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
