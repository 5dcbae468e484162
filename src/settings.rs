//! Stack settings: the values substituted into the embedded templates.
//!
//! Every field has a compiled-in default, so an installation without a
//! settings file renders byte-for-byte identical output. A JSON file may
//! override any subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{PodstackError, Result};

/// Container images used by the compose file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Images {
    pub postgres: String,
    pub mariadb: String,
    pub mongo: String,
    pub memcached: String,
    pub redis: String,
    pub twemproxy: String,
}

impl Default for Images {
    fn default() -> Self {
        Self {
            postgres: "docker.io/library/postgres:16".to_string(),
            mariadb: "docker.io/library/mariadb:11".to_string(),
            mongo: "docker.io/library/mongo:7".to_string(),
            memcached: "docker.io/library/memcached:1.6-alpine".to_string(),
            redis: "docker.io/library/redis:7.2-alpine".to_string(),
            twemproxy: "docker.io/malexer/twemproxy:latest".to_string(),
        }
    }
}

/// Credentials baked into the compose file and service configs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,
    pub mariadb_root_password: String,
    pub mariadb_user: String,
    pub mariadb_password: String,
    pub mariadb_database: String,
    pub mongo_root_user: String,
    pub mongo_root_password: String,
    pub redis_password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            postgres_user: "app".to_string(),
            postgres_password: "app".to_string(),
            postgres_db: "app".to_string(),
            mariadb_root_password: "root".to_string(),
            mariadb_user: "app".to_string(),
            mariadb_password: "app".to_string(),
            mariadb_database: "app".to_string(),
            mongo_root_user: "root".to_string(),
            mongo_root_password: "root".to_string(),
            redis_password: "redis".to_string(),
        }
    }
}

/// Host ports published on `bind_address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ports {
    pub postgres: u16,
    pub mariadb: u16,
    pub mongo: u16,
    pub memcached: u16,
    pub redis: u16,
    pub redis_tls: u16,
    pub redis_primary: u16,
    pub redis_replica: u16,
    /// One port per Sentinel instance
    pub sentinel: Vec<u16>,
    pub twemproxy: u16,
    pub twemproxy_stats: u16,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            postgres: 5432,
            mariadb: 3306,
            mongo: 27017,
            memcached: 11211,
            redis: 6379,
            redis_tls: 6380,
            redis_primary: 6381,
            redis_replica: 6382,
            sentinel: vec![26379, 26380, 26381],
            twemproxy: 22121,
            twemproxy_stats: 22222,
        }
    }
}

impl Ports {
    /// All published ports with a label, in template order
    pub fn labelled(&self) -> Vec<(String, u16)> {
        let mut ports = vec![
            ("postgres".to_string(), self.postgres),
            ("mariadb".to_string(), self.mariadb),
            ("mongo".to_string(), self.mongo),
            ("memcached".to_string(), self.memcached),
            ("redis".to_string(), self.redis),
            ("redis_tls".to_string(), self.redis_tls),
            ("redis_primary".to_string(), self.redis_primary),
            ("redis_replica".to_string(), self.redis_replica),
        ];
        for (i, port) in self.sentinel.iter().enumerate() {
            ports.push((format!("sentinel[{}]", i), *port));
        }
        ports.push(("twemproxy".to_string(), self.twemproxy));
        ports.push(("twemproxy_stats".to_string(), self.twemproxy_stats));
        ports
    }
}

/// Parameters for the self-signed certificate chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    pub organization: String,
    pub ca_common_name: String,
    pub server_common_name: String,
    pub client_common_name: String,
    pub ca_days: u32,
    pub cert_days: u32,
    pub ca_key_bits: u32,
    pub key_bits: u32,
    /// Extra DNS names for the server certificate (besides the common name)
    pub server_dns_names: Vec<String>,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            organization: "Podstack Development".to_string(),
            ca_common_name: "Podstack Development CA".to_string(),
            server_common_name: "localhost".to_string(),
            client_common_name: "podstack-client".to_string(),
            ca_days: 3650,
            cert_days: 825,
            ca_key_bits: 4096,
            key_bits: 2048,
            server_dns_names: vec!["redis-tls".to_string()],
        }
    }
}

/// Accepted RSA modulus sizes
pub const KEY_BITS_ALLOWED: &[u32] = &[2048, 3072, 4096];

/// Complete settings for one rendered stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackSettings {
    /// Compose project name, also used as container name prefix
    pub project_name: String,
    /// Address host ports are published on
    pub bind_address: String,
    /// Name Sentinel uses for the replicated primary
    pub sentinel_master_name: String,
    /// Number of Sentinels that must agree before a failover
    pub sentinel_quorum: u8,
    /// uid inside the user namespace that should own data and TLS material
    pub container_uid: u32,
    pub container_gid: u32,
    pub images: Images,
    pub credentials: Credentials,
    pub ports: Ports,
    pub tls: TlsSettings,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            project_name: "podstack".to_string(),
            bind_address: "127.0.0.1".to_string(),
            sentinel_master_name: "podstack-primary".to_string(),
            sentinel_quorum: 2,
            container_uid: 999,
            container_gid: 999,
            images: Images::default(),
            credentials: Credentials::default(),
            ports: Ports::default(),
            tls: TlsSettings::default(),
        }
    }
}

impl StackSettings {
    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Load settings from a JSON file. Absent fields keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            PodstackError::config(format!(
                "failed to read settings from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PodstackError::config(format!(
                "failed to parse settings {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let name = self.project_name.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
            _ => {
                return Err(PodstackError::validation(
                    "project name must start with a lowercase letter or digit",
                ));
            }
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_') {
            return Err(PodstackError::validation(
                "project name may only contain lowercase letters, digits, '-' and '_'",
            ));
        }

        if self.bind_address.parse::<std::net::IpAddr>().is_err() {
            return Err(PodstackError::validation(format!(
                "bind address '{}' is not an IP address",
                self.bind_address
            )));
        }

        self.validate_credentials()?;
        self.validate_ports()?;
        self.validate_sentinel()?;
        self.validate_tls()?;

        Ok(())
    }

    fn validate_credentials(&self) -> Result<()> {
        let c = &self.credentials;
        let fields = [
            ("postgres_user", &c.postgres_user),
            ("postgres_password", &c.postgres_password),
            ("postgres_db", &c.postgres_db),
            ("mariadb_root_password", &c.mariadb_root_password),
            ("mariadb_user", &c.mariadb_user),
            ("mariadb_password", &c.mariadb_password),
            ("mariadb_database", &c.mariadb_database),
            ("mongo_root_user", &c.mongo_root_user),
            ("mongo_root_password", &c.mongo_root_password),
            ("redis_password", &c.redis_password),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(PodstackError::validation(format!("{} must not be empty", field)));
            }
            // Redis configs take the value as a single bare word
            if value.chars().any(|ch| ch.is_whitespace() || ch == '"' || ch == '\'') {
                return Err(PodstackError::validation(format!(
                    "{} cannot contain whitespace or quotes",
                    field
                )));
            }
        }
        Ok(())
    }

    fn validate_ports(&self) -> Result<()> {
        if self.ports.sentinel.len() != 3 {
            return Err(PodstackError::validation(format!(
                "exactly 3 sentinel ports are required, got {}",
                self.ports.sentinel.len()
            )));
        }

        let mut seen = HashSet::new();
        for (label, port) in self.ports.labelled() {
            if port == 0 {
                return Err(PodstackError::validation(format!("port {} must not be 0", label)));
            }
            if !seen.insert(port) {
                return Err(PodstackError::validation(format!(
                    "port {} ({}) is used more than once",
                    port, label
                )));
            }
        }
        Ok(())
    }

    fn validate_sentinel(&self) -> Result<()> {
        if self.sentinel_master_name.is_empty()
            || !self
                .sentinel_master_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PodstackError::validation(
                "sentinel master name must be non-empty and contain only letters, digits, '-' and '_'",
            ));
        }
        let instances = self.ports.sentinel.len() as u8;
        if self.sentinel_quorum == 0 || self.sentinel_quorum > instances {
            return Err(PodstackError::validation(format!(
                "sentinel quorum must be between 1 and {}",
                instances
            )));
        }
        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        let tls = &self.tls;
        if tls.ca_days == 0 || tls.cert_days == 0 {
            return Err(PodstackError::validation("certificate validity must be at least one day"));
        }
        if tls.cert_days > tls.ca_days {
            return Err(PodstackError::validation(
                "leaf certificates cannot outlive the CA (cert_days > ca_days)",
            ));
        }
        for bits in [tls.ca_key_bits, tls.key_bits] {
            if !KEY_BITS_ALLOWED.contains(&bits) {
                return Err(PodstackError::validation(format!(
                    "RSA key size {} is not one of {:?}",
                    bits, KEY_BITS_ALLOWED
                )));
            }
        }
        for (field, value) in [
            ("organization", &tls.organization),
            ("ca_common_name", &tls.ca_common_name),
            ("server_common_name", &tls.server_common_name),
            ("client_common_name", &tls.client_common_name),
        ] {
            // '/' and '=' would break the -subj string
            if value.is_empty() || value.contains('/') || value.contains('=') {
                return Err(PodstackError::validation(format!(
                    "{} must be non-empty and cannot contain '/' or '='",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Build the Tera context used for every template
    pub fn to_context(&self) -> Result<tera::Context> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_are_valid() {
        StackSettings::default().validate().expect("defaults must validate");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "project_name": "shop", "ports": { "redis": 7000 } }"#)
            .expect("write settings");

        let settings = StackSettings::load_from_file(&path).expect("load");
        assert_eq!(settings.project_name, "shop");
        assert_eq!(settings.ports.redis, 7000);
        assert_eq!(settings.ports.postgres, 5432);
        assert_eq!(settings.credentials, Credentials::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        let mut settings = StackSettings::default();
        settings.tls.cert_days = 30;
        settings.save_to_file(&path).expect("save");

        let loaded = StackSettings::load_from_file(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");

        let err = StackSettings::load_from_file(&path).unwrap_err();
        assert!(matches!(err, PodstackError::Config(_)));
    }

    #[test]
    fn test_duplicate_ports_rejected() {
        let mut settings = StackSettings::default();
        settings.ports.redis_tls = settings.ports.redis;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("used more than once"));
    }

    #[test]
    fn test_sentinel_port_count_enforced() {
        let mut settings = StackSettings::default();
        settings.ports.sentinel.pop();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_quorum_bounds() {
        let mut settings = StackSettings::default();
        settings.sentinel_quorum = 4;
        assert!(settings.validate().is_err());
        settings.sentinel_quorum = 0;
        assert!(settings.validate().is_err());
        settings.sentinel_quorum = 3;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_project_name_rules() {
        let mut settings = StackSettings::default();
        settings.project_name = "My Stack".to_string();
        assert!(settings.validate().is_err());
        settings.project_name = "-stack".to_string();
        assert!(settings.validate().is_err());
        settings.project_name = "stack_2-dev".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_credentials_without_whitespace() {
        let mut settings = StackSettings::default();
        settings.credentials.redis_password = "two words".to_string();
        assert!(settings.validate().is_err());
        settings.credentials.redis_password = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_credentials_with_yaml_significant_characters() {
        let mut settings = StackSettings::default();
        settings.credentials.postgres_password = "#s3cret".to_string();
        settings.credentials.mariadb_password = "pa$$word".to_string();
        settings.credentials.mongo_root_user = "no".to_string();
        settings.credentials.redis_password = "a:b&c*!".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_tls_rules() {
        let mut settings = StackSettings::default();
        settings.tls.key_bits = 1024;
        assert!(settings.validate().is_err());

        let mut settings = StackSettings::default();
        settings.tls.cert_days = settings.tls.ca_days + 1;
        assert!(settings.validate().is_err());

        let mut settings = StackSettings::default();
        settings.tls.organization = "Acme/Evil".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_context_exposes_nested_fields() {
        let ctx = StackSettings::default().to_context().expect("context");
        let json = ctx.into_json();
        assert_eq!(json["ports"]["redis_tls"], 6380);
        assert_eq!(json["credentials"]["redis_password"], "redis");
    }
}
