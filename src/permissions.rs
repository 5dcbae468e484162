//! File modes and container-side ownership for the generated tree.
//!
//! Modes are set directly. Ownership goes through `podman unshare chown`,
//! which is best effort: on failure the installer warns and carries on.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::Result;
use crate::sanity::Toolchain;
use crate::tool_runner::run_tool_safe;
use crate::tools::podman::PodmanChownArgs;

pub const DIR_MODE: u32 = 0o755;
pub const FILE_MODE: u32 = 0o644;
/// Sentinel rewrites its config in place, as a container user we do not own
pub const SHARED_DIR_MODE: u32 = 0o777;
pub const SHARED_FILE_MODE: u32 = 0o666;

/// Set `mode` on `path`; when `recursive`, also on everything below it.
///
/// In recursive mode directories get `dir_mode` and files `mode`.
pub fn apply_mode(path: &Path, mode: u32, dir_mode: u32, recursive: bool) -> Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }

    if meta.is_dir() {
        fs::set_permissions(path, fs::Permissions::from_mode(dir_mode))?;
        if recursive {
            for entry in fs::read_dir(path)? {
                apply_mode(&entry?.path(), mode, dir_mode, true)?;
            }
        }
    } else {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }

    tracing::debug!("chmod {:o} {}", mode, path.display());
    Ok(())
}

/// Outcome of an ownership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChownOutcome {
    Changed,
    /// Failed; the message explains why. Not fatal.
    Skipped(String),
}

/// Change ownership inside the rootless user namespace. Never fails the run.
pub fn change_owner(toolchain: &Toolchain, path: &Path, uid: u32, gid: u32) -> ChownOutcome {
    let args = PodmanChownArgs {
        path: path.to_path_buf(),
        uid,
        gid,
        recursive: true,
    };

    let reason = match run_tool_safe(toolchain, &args) {
        Ok(output) if output.success => {
            tracing::info!("Changed ownership of {} to {}:{}", path.display(), uid, gid);
            return ChownOutcome::Changed;
        }
        Ok(output) => output.stderr.trim().to_string(),
        Err(e) => e.to_string(),
    };

    tracing::warn!(
        "Could not change ownership of {} to {}:{}: {}",
        path.display(),
        uid,
        gid,
        reason
    );
    ChownOutcome::Skipped(reason)
}
