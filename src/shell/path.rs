//! Executable lookup on the search path.

use std::path::{Path, PathBuf};

use super::platform::HostFamily;

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command: `which` behavior varies across systems and
/// is sometimes a shell builtin with inconsistent error handling.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf], family: HostFamily) -> Option<PathBuf> {
    for dir in path_entries {
        for suffix in family.executable_suffixes() {
            let candidate = dir.join(format!("{}{}", tool, suffix));
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Resolve a tool for the current host.
pub fn find_on_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    resolve_tool_path(tool, path_entries, HostFamily::current())
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn resolves_executable_in_later_entry() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&second.path().join("git"));

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = resolve_tool_path("git", &entries, HostFamily::Unix);

        assert_eq!(found, Some(second.path().join("git")));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("code"), "not executable").unwrap();

        let entries = vec![dir.path().to_path_buf()];
        assert!(resolve_tool_path("code", &entries, HostFamily::Unix).is_none());
    }

    #[test]
    fn windows_family_tries_exe_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("python.exe"), "").unwrap();
        #[cfg(unix)]
        make_executable(&dir.path().join("python.exe"));

        let entries = vec![dir.path().to_path_buf()];
        let found = resolve_tool_path("python", &entries, HostFamily::Windows);

        assert_eq!(found, Some(dir.path().join("python.exe")));
    }

    #[test]
    fn empty_path_finds_nothing() {
        assert!(resolve_tool_path("git", &[], HostFamily::Unix).is_none());
    }
}
