//! Pre-flight dependency checks
//!
//! Verifies that `podman`, `podman-compose` and `openssl` are on `PATH`
//! before anything is written. If any is missing the program prints every
//! missing binary with an install hint and exits with status 1.

use crate::error::{PodstackError, Result};
use crate::types::Tool;
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// Resolved absolute paths of the required binaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub podman: PathBuf,
    pub podman_compose: PathBuf,
    pub openssl: PathBuf,
}

impl Toolchain {
    pub fn path_of(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Podman => &self.podman,
            Tool::PodmanCompose => &self.podman_compose,
            Tool::Openssl => &self.openssl,
        }
    }
}

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing: Vec<Tool>,
    pub toolchain: Option<Toolchain>,
}

impl SanityCheckResult {
    /// Returns true if every required binary was found
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_binaries(&self) -> Vec<String> {
        self.missing.iter().map(|t| t.binary().to_string()).collect()
    }

    /// The resolved toolchain, or a `Dependency` error naming what is missing
    pub fn require_toolchain(&self) -> Result<Toolchain> {
        match &self.toolchain {
            Some(toolchain) if self.is_ok() => Ok(toolchain.clone()),
            _ => Err(PodstackError::Dependency(self.missing_binaries())),
        }
    }
}

/// Look up an executable regular file called `name` in a `PATH`-style list
pub fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Check all required binaries against the given `PATH` value
pub fn verify_environment_in(path_var: &OsStr) -> SanityCheckResult {
    let mut missing = Vec::new();
    let mut found = Vec::new();

    for tool in Tool::iter() {
        match find_in_path(tool.binary(), path_var) {
            Some(path) => {
                tracing::debug!("found {} at {}", tool, path.display());
                found.push((tool, path));
            }
            None => missing.push(tool),
        }
    }

    let toolchain = if missing.is_empty() {
        let lookup = |wanted: Tool| {
            found
                .iter()
                .find(|(tool, _)| *tool == wanted)
                .map(|(_, path)| path.clone())
                .unwrap_or_default()
        };
        Some(Toolchain {
            podman: lookup(Tool::Podman),
            podman_compose: lookup(Tool::PodmanCompose),
            openssl: lookup(Tool::Openssl),
        })
    } else {
        None
    };

    SanityCheckResult { missing, toolchain }
}

/// Check all required binaries against the process `PATH`
pub fn verify_environment() -> SanityCheckResult {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    verify_environment_in(&path_var)
}

/// Render the failure report printed before exiting
pub fn format_missing_report(result: &SanityCheckResult) -> String {
    let mut lines = vec![
        "✗ Missing required dependencies:".to_string(),
    ];
    for tool in &result.missing {
        lines.push(format!("   • {} ({})", tool.binary(), tool.install_hint()));
    }
    lines.push(String::new());
    lines.push("Install the missing tools and run podstack again.".to_string());
    lines.join("\n")
}

/// Print the missing-dependency report to stderr and exit with status 1
pub fn print_error_and_exit(result: &SanityCheckResult) -> ! {
    eprintln!("{}", format_missing_report(result));
    std::process::exit(1);
}

/// Verify the environment, exiting with status 1 if anything is missing
pub fn run_preflight_checks() -> Toolchain {
    tracing::debug!("Running pre-flight dependency checks");

    let result = verify_environment();
    match result.require_toolchain() {
        Ok(toolchain) => {
            tracing::info!("Pre-flight checks passed: podman, podman-compose, openssl present");
            toolchain
        }
        Err(e) => {
            tracing::error!("{}", e);
            print_error_and_exit(&result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn touch_executable(dir: &Path, name: &str, mode: u32) {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).expect("chmod");
    }

    fn path_of(dirs: &[&Path]) -> OsString {
        std::env::join_paths(dirs).expect("join paths")
    }

    #[test]
    fn test_all_present() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["podman", "podman-compose", "openssl"] {
            touch_executable(dir.path(), name, 0o755);
        }

        let result = verify_environment_in(&path_of(&[dir.path()]));
        assert!(result.is_ok());
        let toolchain = result.toolchain.expect("toolchain");
        assert_eq!(toolchain.openssl, dir.path().join("openssl"));
        assert_eq!(toolchain.path_of(Tool::PodmanCompose), dir.path().join("podman-compose"));
    }

    #[test]
    fn test_reports_each_missing_binary() {
        let dir = TempDir::new().expect("tempdir");
        touch_executable(dir.path(), "podman", 0o755);

        let result = verify_environment_in(&path_of(&[dir.path()]));
        assert!(!result.is_ok());
        assert!(result.toolchain.is_none());
        assert_eq!(result.missing_binaries(), vec!["podman-compose", "openssl"]);
    }

    #[test]
    fn test_non_executable_file_is_missing() {
        let dir = TempDir::new().expect("tempdir");
        touch_executable(dir.path(), "openssl", 0o644);
        assert!(find_in_path("openssl", &path_of(&[dir.path()])).is_none());
    }

    #[test]
    fn test_directory_named_like_binary_is_missing() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("podman")).expect("mkdir");
        assert!(find_in_path("podman", &path_of(&[dir.path()])).is_none());
    }

    #[test]
    fn test_first_path_entry_wins() {
        let first = TempDir::new().expect("tempdir");
        let second = TempDir::new().expect("tempdir");
        touch_executable(first.path(), "openssl", 0o755);
        touch_executable(second.path(), "openssl", 0o755);

        let found = find_in_path("openssl", &path_of(&[first.path(), second.path()]));
        assert_eq!(found, Some(first.path().join("openssl")));
    }

    #[test]
    fn test_require_toolchain_names_missing() {
        let result = verify_environment_in(OsStr::new(""));
        let err = result.require_toolchain().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required binaries: podman, podman-compose, openssl"
        );
    }

    #[test]
    fn test_empty_path() {
        let result = verify_environment_in(OsStr::new(""));
        assert_eq!(result.missing.len(), 3);
    }

    #[test]
    fn test_missing_report_mentions_hints() {
        let result = SanityCheckResult {
            missing: vec![Tool::PodmanCompose],
            toolchain: None,
        };
        let report = format_missing_report(&result);
        assert!(report.contains("podman-compose"));
        assert!(report.contains("pip install --user podman-compose"));
    }
}
