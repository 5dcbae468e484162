//! Install plan engine
//!
//! Translates a target directory plus `StackSettings` into an ordered
//! sequence of `InstallOp`s that the installer executes.
//!
//! # Ordering
//!
//! | Phase | Operations |
//! |-------|------------|
//! | 1 | `CreateDir` for every directory, parents first |
//! | 2 | `WriteFile` for every embedded template |
//! | 3 | `IssueCertificates` (needs `tls/openssl.cnf` from phase 2) |
//! | 4 | `SetMode` on generated files and directories |
//! | 5 | `ChangeOwner` on container data (best effort) |
//!
//! Plan generation is pure: no I/O happens here.

use crate::error::{PodstackError, Result};
use crate::permissions::{DIR_MODE, FILE_MODE, SHARED_DIR_MODE, SHARED_FILE_MODE};
use crate::settings::StackSettings;
use crate::types::DataService;
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory holding the certificate chain, relative to the target
pub const TLS_DIR: &str = "tls";
/// Directory holding per-service data, relative to the target
pub const DATA_DIR: &str = "data";

/// Config directories rendered from templates, relative to the target
const CONFIG_DIRS: &[&str] = &[
    "redis",
    "redis-tls",
    "redis-replication",
    "redis-shards",
    "twemproxy",
    "postgres",
    "mariadb",
    TLS_DIR,
];

/// (output path, template name) for every template rendered once
const SINGLE_FILES: &[(&str, &str)] = &[
    ("compose.yaml", "compose.yaml"),
    ("README.md", "README.md"),
    ("redis/redis.conf", "redis/redis.conf"),
    ("redis-tls/redis.conf", "redis-tls/redis.conf"),
    ("redis-replication/primary.conf", "redis-replication/primary.conf"),
    ("redis-replication/replica.conf", "redis-replication/replica.conf"),
    ("redis-shards/shard.conf", "redis-shards/shard.conf"),
    ("twemproxy/nutcracker.yml", "twemproxy/nutcracker.yml"),
    ("postgres/init.sql", "postgres/init.sql"),
    ("mariadb/my.cnf", "mariadb/my.cnf"),
    ("tls/openssl.cnf", "tls/openssl.cnf"),
];

const SENTINEL_DIR: &str = "sentinel";
const SENTINEL_TEMPLATE: &str = "sentinel/sentinel.conf";

/// A single step of the installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOp {
    /// Create a directory (and missing parents)
    CreateDir { path: PathBuf },

    /// Render an embedded template to a file
    WriteFile {
        path: PathBuf,
        template: String,
        /// Per-file variables added on top of the settings context
        vars: Vec<(String, String)>,
    },

    /// Issue the CA/server/client chain in `tls_dir`
    IssueCertificates { tls_dir: PathBuf, renew: bool },

    /// chmod; with `recursive`, directories get `dir_mode` and files `mode`
    SetMode {
        path: PathBuf,
        mode: u32,
        dir_mode: u32,
        recursive: bool,
    },

    /// `podman unshare chown -R uid:gid path`, best effort
    ChangeOwner { path: PathBuf, uid: u32, gid: u32 },
}

impl InstallOp {
    /// Path the operation acts on
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path }
            | Self::WriteFile { path, .. }
            | Self::SetMode { path, .. }
            | Self::ChangeOwner { path, .. } => path,
            Self::IssueCertificates { tls_dir, .. } => tls_dir,
        }
    }

    /// Ordering phase, see module docs
    pub fn phase(&self) -> u8 {
        match self {
            Self::CreateDir { .. } => 1,
            Self::WriteFile { .. } => 2,
            Self::IssueCertificates { .. } => 3,
            Self::SetMode { .. } => 4,
            Self::ChangeOwner { .. } => 5,
        }
    }
}

impl fmt::Display for InstallOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path } => write!(f, "CreateDir({})", path.display()),
            Self::WriteFile { path, template, .. } => {
                write!(f, "WriteFile({} <- {})", path.display(), template)
            }
            Self::IssueCertificates { tls_dir, renew } => {
                write!(f, "IssueCertificates({}, renew={})", tls_dir.display(), renew)
            }
            Self::SetMode { path, mode, dir_mode, recursive } => {
                if *recursive {
                    write!(f, "SetMode({}, files={:o}, dirs={:o}, recursive)", path.display(), mode, dir_mode)
                } else {
                    write!(f, "SetMode({}, {:o})", path.display(), mode)
                }
            }
            Self::ChangeOwner { path, uid, gid } => {
                write!(f, "ChangeOwner({} -> {}:{})", path.display(), uid, gid)
            }
        }
    }
}

/// Caller-provided knobs that influence the plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Reissue certificates even if a CA already exists
    pub renew_certs: bool,
}

/// A complete install plan: an ordered list of operations.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub target: PathBuf,
    pub ops: Vec<InstallOp>,
}

impl InstallPlan {
    /// Every file rendered from a template
    pub fn rendered_files(&self) -> Vec<&Path> {
        self.ops
            .iter()
            .filter(|op| matches!(op, InstallOp::WriteFile { .. }))
            .map(InstallOp::path)
            .collect()
    }

    /// Returns a summary of the plan for logging/display.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Install Plan: {}", self.target.display()),
            format!("  Operations ({}):", self.ops.len()),
        ];
        for (i, op) in self.ops.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, op));
        }
        lines.join("\n")
    }
}

/// Calculate the install plan for `target`.
///
/// # Errors
///
/// - the settings fail validation
/// - `target` is empty
pub fn calculate_install_plan(
    target: &Path,
    settings: &StackSettings,
    options: PlanOptions,
) -> Result<InstallPlan> {
    settings.validate()?;

    if target.as_os_str().is_empty() {
        return Err(PodstackError::validation("installation directory must not be empty"));
    }

    let sentinel_count = settings.ports.sentinel.len();
    let sentinel_dirs: Vec<String> = (1..=sentinel_count)
        .map(|i| format!("{}/sentinel-{}", SENTINEL_DIR, i))
        .collect();
    let data_dirs = DataService::all_data_dirs();

    let mut ops = Vec::new();

    // Phase 1: directories
    ops.push(InstallOp::CreateDir { path: target.to_path_buf() });
    for dir in CONFIG_DIRS {
        ops.push(InstallOp::CreateDir { path: target.join(dir) });
    }
    ops.push(InstallOp::CreateDir { path: target.join(SENTINEL_DIR) });
    for dir in &sentinel_dirs {
        ops.push(InstallOp::CreateDir { path: target.join(dir) });
    }
    ops.push(InstallOp::CreateDir { path: target.join(DATA_DIR) });
    for dir in &data_dirs {
        ops.push(InstallOp::CreateDir { path: target.join(dir) });
    }

    // Phase 2: rendered files
    for (path, template) in SINGLE_FILES {
        ops.push(InstallOp::WriteFile {
            path: target.join(path),
            template: template.to_string(),
            vars: vec![],
        });
    }
    for (i, dir) in sentinel_dirs.iter().enumerate() {
        ops.push(InstallOp::WriteFile {
            path: target.join(dir).join("sentinel.conf"),
            template: SENTINEL_TEMPLATE.to_string(),
            vars: vec![("sentinel_name".to_string(), format!("sentinel-{}", i + 1))],
        });
    }

    // Phase 3: certificates
    ops.push(InstallOp::IssueCertificates {
        tls_dir: target.join(TLS_DIR),
        renew: options.renew_certs,
    });

    // Phase 4: modes
    ops.push(InstallOp::SetMode {
        path: target.to_path_buf(),
        mode: DIR_MODE,
        dir_mode: DIR_MODE,
        recursive: false,
    });
    for file in ["compose.yaml", "README.md"] {
        ops.push(InstallOp::SetMode {
            path: target.join(file),
            mode: FILE_MODE,
            dir_mode: DIR_MODE,
            recursive: false,
        });
    }
    for dir in CONFIG_DIRS {
        ops.push(InstallOp::SetMode {
            path: target.join(dir),
            mode: FILE_MODE,
            dir_mode: DIR_MODE,
            recursive: true,
        });
    }
    ops.push(InstallOp::SetMode {
        path: target.join(SENTINEL_DIR),
        mode: SHARED_FILE_MODE,
        dir_mode: SHARED_DIR_MODE,
        recursive: true,
    });

    // Phase 5: ownership
    ops.push(InstallOp::ChangeOwner {
        path: target.join(DATA_DIR),
        uid: settings.container_uid,
        gid: settings.container_gid,
    });

    Ok(InstallPlan {
        target: target.to_path_buf(),
        ops,
    })
}

/// Plan that only (re)issues the certificate chain under `target`.
pub fn calculate_certificate_plan(target: &Path, settings: &StackSettings) -> Result<InstallPlan> {
    settings.validate()?;
    let tls_dir = target.join(TLS_DIR);

    let ops = vec![
        InstallOp::CreateDir { path: tls_dir.clone() },
        InstallOp::WriteFile {
            path: tls_dir.join("openssl.cnf"),
            template: "tls/openssl.cnf".to_string(),
            vars: vec![],
        },
        InstallOp::IssueCertificates {
            tls_dir: tls_dir.clone(),
            renew: true,
        },
        InstallOp::SetMode {
            path: tls_dir,
            mode: FILE_MODE,
            dir_mode: DIR_MODE,
            recursive: true,
        },
    ];

    Ok(InstallPlan {
        target: target.to_path_buf(),
        ops,
    })
}
