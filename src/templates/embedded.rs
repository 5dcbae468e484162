//! Embedded templates - compiled into the binary so the installer is self-contained.
//!
//! Templates are loaded at compile time via `include_str!` and registered with the
//! `TemplateRenderer`. Nothing is read from disk at runtime.

/// Compose file
pub static COMPOSE: &str = include_str!("files/compose.yaml.j2");

/// Redis configs
pub static REDIS_PLAIN: &str = include_str!("files/redis/redis.conf.j2");
pub static REDIS_TLS: &str = include_str!("files/redis-tls/redis.conf.j2");
pub static REDIS_PRIMARY: &str = include_str!("files/redis-replication/primary.conf.j2");
pub static REDIS_REPLICA: &str = include_str!("files/redis-replication/replica.conf.j2");
pub static REDIS_SHARD: &str = include_str!("files/redis-shards/shard.conf.j2");
pub static SENTINEL: &str = include_str!("files/sentinel/sentinel.conf.j2");
pub static TWEMPROXY: &str = include_str!("files/twemproxy/nutcracker.yml.j2");

/// Database configs
pub static POSTGRES_INIT: &str = include_str!("files/postgres/init.sql.j2");
pub static MARIADB_CNF: &str = include_str!("files/mariadb/my.cnf.j2");

/// Certificate extension profiles
pub static OPENSSL_CNF: &str = include_str!("files/tls/openssl.cnf.j2");

pub static README: &str = include_str!("files/README.md.j2");

/// All embedded templates as (name, content) pairs for registration with Tera.
pub const ALL_TEMPLATES: &[(&str, &str)] = &[
    ("compose.yaml", COMPOSE),
    ("redis/redis.conf", REDIS_PLAIN),
    ("redis-tls/redis.conf", REDIS_TLS),
    ("redis-replication/primary.conf", REDIS_PRIMARY),
    ("redis-replication/replica.conf", REDIS_REPLICA),
    ("redis-shards/shard.conf", REDIS_SHARD),
    ("sentinel/sentinel.conf", SENTINEL),
    ("twemproxy/nutcracker.yml", TWEMPROXY),
    ("postgres/init.sql", POSTGRES_INIT),
    ("mariadb/my.cnf", MARIADB_CNF),
    ("tls/openssl.cnf", OPENSSL_CNF),
    ("README.md", README),
];
