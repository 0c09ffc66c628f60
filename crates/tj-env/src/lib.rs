//! tj-env: host capability checks.
//!
//! Native (compiled) solvers need a C++ compiler and `make` on the host. The
//! probe only reports; choosing a solver from the answer is up to the caller.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Executables a native solver build needs.
pub const NATIVE_DEPENDENCIES: [&str; 2] = ["g++", "make"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub found: Vec<(String, PathBuf)>,
    pub missing: Vec<String>,
}

impl ProbeReport {
    pub fn is_supported(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Looks for a set of executables on a search path (`PATH` by default).
#[derive(Debug, Clone)]
pub struct ToolchainProbe {
    tools: Vec<String>,
    search_path: Option<OsString>,
}

impl Default for ToolchainProbe {
    fn default() -> Self {
        Self::new(NATIVE_DEPENDENCIES)
    }
}

impl ToolchainProbe {
    pub fn new<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tools: tools.into_iter().map(Into::into).collect(),
            search_path: None,
        }
    }

    /// Search these directories instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn run(&self) -> ProbeReport {
        let search_path = self
            .search_path
            .clone()
            .or_else(|| env::var_os("PATH"))
            .unwrap_or_default();

        let mut report = ProbeReport {
            found: Vec::new(),
            missing: Vec::new(),
        };
        for tool in &self.tools {
            match find_executable(tool, &search_path) {
                Some(path) => {
                    tracing::debug!(tool = %tool, path = %path.display(), "found executable");
                    report.found.push((tool.clone(), path));
                }
                None => report.missing.push(tool.clone()),
            }
        }
        report
    }
}

/// First directory of `search_path` holding an executable `name`.
pub fn find_executable(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let exts = env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT;.COM".to_string());
    std::iter::once(dir.join(name))
        .chain(
            exts.split(';')
                .filter(|e| !e.is_empty())
                .map(|ext| dir.join(format!("{name}{ext}"))),
        )
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Whether native solvers can be built on this host. Logs a warning naming
/// the missing executables when they cannot.
pub fn check_native_support() -> bool {
    let report = ToolchainProbe::default().run();
    if !report.is_supported() {
        tracing::warn!(
            missing = ?report.missing,
            "Unable to use native solvers due to one or more missing dependencies: {}. \
             Performance can be significantly increased by installing them.",
            report.missing.join(", ")
        );
    }
    report.is_supported()
}
