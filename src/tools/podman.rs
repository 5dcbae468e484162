//! Type-safe arguments for `podman`.

use std::path::PathBuf;

use crate::tool_traits::ToolArgs;
use crate::types::Tool;

/// `podman unshare chown [-R] <uid>:<gid> <path>`
///
/// Runs `chown` inside the rootless user namespace, so `uid` and `gid` are
/// the ids as seen by containers, not by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodmanChownArgs {
    pub path: PathBuf,
    pub uid: u32,
    pub gid: u32,
    pub recursive: bool,
}

impl ToolArgs for PodmanChownArgs {
    fn tool(&self) -> Tool {
        Tool::Podman
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["unshare".to_string(), "chown".to_string()];
        if self.recursive {
            args.push("-R".to_string());
        }
        args.push(format!("{}:{}", self.uid, self.gid));
        args.push(self.path.display().to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_chown_args() {
        let args = PodmanChownArgs {
            path: PathBuf::from("/srv/dev/data"),
            uid: 999,
            gid: 999,
            recursive: true,
        };
        assert_eq!(
            args.to_cli_args(),
            vec!["unshare", "chown", "-R", "999:999", "/srv/dev/data"]
        );
        assert_eq!(args.display(), "podman unshare chown -R 999:999 /srv/dev/data");
    }

    #[test]
    fn test_single_path_chown_args() {
        let args = PodmanChownArgs {
            path: PathBuf::from("tls/server.key"),
            uid: 0,
            gid: 0,
            recursive: false,
        };
        assert_eq!(args.to_cli_args(), vec!["unshare", "chown", "0:0", "tls/server.key"]);
    }
}
