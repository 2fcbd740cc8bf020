//! Per-host layout of a virtual environment.
//!
//! Everything host-specific about an environment lives in one table keyed by
//! [`HostFamily`].

use crate::shell::HostFamily;

/// Where executables live inside an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvLayout {
    /// Executable directory relative to the environment root.
    pub bin_dir: &'static str,

    /// Suffix appended to executable names.
    pub exe_suffix: &'static str,

    /// Interpreters tried in order when none is configured.
    pub python_candidates: &'static [&'static str],
}

const WINDOWS: EnvLayout = EnvLayout {
    bin_dir: "Scripts",
    exe_suffix: ".exe",
    python_candidates: &["python", "py"],
};

const UNIX: EnvLayout = EnvLayout {
    bin_dir: "bin",
    exe_suffix: "",
    python_candidates: &["python3", "python"],
};

impl EnvLayout {
    /// Layout for a host family.
    pub fn for_family(family: HostFamily) -> Self {
        match family {
            HostFamily::Windows => WINDOWS,
            HostFamily::Unix => UNIX,
        }
    }

    /// File name of `tool` inside the executable directory.
    pub fn executable(&self, tool: &str) -> String {
        format!("{}{}", tool, self.exe_suffix)
    }
}
