//! Type-safe external tool execution.
//!
//! All `openssl` and `podman` invocations go through `run_tool_safe`, which:
//!
//! - resolves the binary through the `Toolchain` found by the preflight check
//! - spawns it in its own process group and registers the PID for cleanup
//! - skips mutating invocations in dry-run mode

use crate::error::{PodstackError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use crate::sanity::Toolchain;
use crate::tool_traits::{is_dry_run, ToolArgs};
use std::process::{Command, Stdio};

/// Execute an external tool with type-safe arguments.
///
/// Returns `Ok` with the captured output whether or not the tool exited
/// successfully; callers decide via `ensure_success`. `Err` means the tool
/// could not be spawned at all.
pub fn run_tool_safe<T: ToolArgs + ?Sized>(toolchain: &Toolchain, args: &T) -> Result<ToolOutput> {
    let tool = args.tool();
    let program = toolchain.path_of(tool);
    let cli_args = args.to_cli_args();
    let env_vars = args.get_env_vars();

    if is_dry_run() && args.is_mutating() {
        tracing::info!("[dry-run] would run: {}", args.display());
        return Ok(ToolOutput::dry_run());
    }

    tracing::debug!(
        "run_tool_safe: {} args={:?} env={:?}",
        program.display(),
        cli_args,
        env_vars
    );

    let mut cmd = Command::new(program);
    cmd.args(&cli_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .in_new_process_group();
    for (key, value) in &env_vars {
        cmd.env(key, value);
    }

    let child = cmd.spawn().map_err(|e| {
        PodstackError::tool(format!("failed to spawn {}: {}", program.display(), e))
    })?;
    let pid = child.id();
    ChildRegistry::global().register(pid);

    let output = child.wait_with_output();
    ChildRegistry::global().unregister(pid);
    let output =
        output.map_err(|e| PodstackError::tool(format!("failed waiting for {}: {}", tool, e)))?;

    let result = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
        success: output.status.success(),
        dry_run: false,
    };

    if result.success {
        tracing::debug!("{} exited successfully", args.display());
    } else {
        tracing::debug!(
            "{} failed with exit code {}",
            args.display(),
            result.exit_code.unwrap_or(-1)
        );
    }

    Ok(result)
}

/// Output from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Whether execution was skipped because of dry-run mode.
    pub dry_run: bool,
}

impl ToolOutput {
    fn dry_run() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: true,
        }
    }

    /// Turn a failed execution into an error carrying stderr.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let code = self
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        Err(PodstackError::tool(format!(
            "{} failed (exit code {}): {}",
            context,
            code,
            self.stderr.trim()
        )))
    }
}
