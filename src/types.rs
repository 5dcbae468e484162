//! Type-safe enums for the tools podstack drives and the services it lays out.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// External binaries the installer depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Tool {
    #[strum(serialize = "podman")]
    Podman,
    #[strum(serialize = "podman-compose")]
    PodmanCompose,
    #[strum(serialize = "openssl")]
    Openssl,
}

impl Tool {
    /// Binary name looked up in `PATH`
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Podman => "podman",
            Self::PodmanCompose => "podman-compose",
            Self::Openssl => "openssl",
        }
    }

    /// Installation hint shown when the binary is missing
    pub fn install_hint(&self) -> &'static str {
        match self {
            Self::Podman => "install the 'podman' package from your distribution",
            Self::PodmanCompose => "install 'podman-compose' (distribution package or `pip install --user podman-compose`)",
            Self::Openssl => "install the 'openssl' package from your distribution",
        }
    }
}

/// Stateful services that get a directory under `data/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum DataService {
    Postgres,
    Mariadb,
    Mongo,
    Redis,
    RedisTls,
    RedisPrimary,
    RedisReplica,
    #[strum(serialize = "redis-shard-1")]
    RedisShard1,
    #[strum(serialize = "redis-shard-2")]
    RedisShard2,
}

impl DataService {
    /// Relative data directory for this service
    pub fn data_dir(&self) -> String {
        format!("data/{}", self)
    }

    /// All data directories in a stable order
    pub fn all_data_dirs() -> Vec<String> {
        Self::iter().map(|s| s.data_dir()).collect()
    }
}
