//! Type-safe external tool argument contracts.
//!
//! Every `openssl` and `podman` invocation is described by a struct that
//! implements `ToolArgs`. The struct definition is the contract: flag names
//! live in one place and the runner never assembles raw argument vectors.

use crate::types::Tool;
use std::sync::atomic::{AtomicBool, Ordering};

static DRY_RUN: AtomicBool = AtomicBool::new(false);

/// Enable dry-run mode globally. Mutating tools and file writes are logged, not performed.
pub fn enable_dry_run() {
    DRY_RUN.store(true, Ordering::SeqCst);
}

/// Whether dry-run mode is active.
pub fn is_dry_run() -> bool {
    DRY_RUN.load(Ordering::SeqCst)
}

/// Trait for typed tool arguments.
///
/// # Contract
///
/// - `tool()`: which external binary runs these arguments.
/// - `to_cli_args()`: arguments exactly as the tool expects them.
/// - `get_env_vars()`: extra environment for the child.
/// - `is_mutating()`: whether the invocation changes the filesystem.
///   Mutating invocations are skipped in dry-run mode.
///
/// # Example
///
/// ```
/// use podstack::tool_traits::ToolArgs;
/// use podstack::tools::openssl::GenRsaArgs;
/// use std::path::PathBuf;
///
/// let args = GenRsaArgs { out: PathBuf::from("tls/ca.key"), bits: 4096 };
/// assert_eq!(args.to_cli_args(), vec!["genrsa", "-out", "tls/ca.key", "4096"]);
/// ```
pub trait ToolArgs {
    /// The binary these arguments are meant for.
    fn tool(&self) -> Tool;

    /// Convert struct fields to CLI arguments.
    fn to_cli_args(&self) -> Vec<String>;

    /// Environment variables the tool requires.
    fn get_env_vars(&self) -> Vec<(String, String)> {
        vec![]
    }

    /// Whether the invocation writes to the filesystem.
    fn is_mutating(&self) -> bool {
        true
    }

    /// Human-readable command line for logs.
    fn display(&self) -> String {
        let mut parts = vec![self.tool().to_string()];
        parts.extend(self.to_cli_args());
        parts.join(" ")
    }
}
