//! Rendering tests for the embedded templates and the install plan,
//! driven through the public library API.

use std::path::Path;

use podstack::engine::plan::{calculate_install_plan, InstallOp, PlanOptions};
use podstack::{StackSettings, TemplateRenderer};

fn render(name: &str, settings: &StackSettings) -> String {
    let renderer = TemplateRenderer::from_embedded().expect("renderer");
    let mut context = settings.to_context().expect("context");
    context.insert("sentinel_name", "sentinel-1");
    renderer.render(name, &context).expect("render")
}

#[test]
fn test_every_template_renders_with_defaults() {
    let renderer = TemplateRenderer::from_embedded().expect("renderer");
    let settings = StackSettings::default();

    for name in renderer.list_templates() {
        let output = render(&name, &settings);
        assert!(!output.contains("{{"), "{} left a placeholder", name);
        assert!(!output.contains("{%"), "{} left a tag", name);
        assert!(output.ends_with('\n'), "{} should end with a newline", name);
    }
}

#[test]
fn test_tls_redis_disables_plain_port() {
    let conf = render("redis-tls/redis.conf", &StackSettings::default());
    let lines: Vec<&str> = conf.lines().collect();

    assert!(lines.contains(&"port 0"));
    assert!(lines.contains(&"tls-port 6379"));
    assert!(lines.contains(&"tls-cert-file /tls/server.crt"));
    assert!(lines.contains(&"tls-key-file /tls/server.key"));
    assert!(lines.contains(&"tls-ca-cert-file /tls/ca.crt"));
    assert!(lines.contains(&"requirepass redis"));
}

#[test]
fn test_replica_follows_primary() {
    let conf = render("redis-replication/replica.conf", &StackSettings::default());
    assert!(conf.contains("replicaof redis-primary 6379\n"));
    assert!(conf.contains("masterauth redis\n"));
}

#[test]
fn test_sentinel_uses_configured_master_and_quorum() {
    let mut settings = StackSettings::default();
    settings.sentinel_master_name = "orders".to_string();
    settings.sentinel_quorum = 3;
    settings.credentials.redis_password = "s3cret".to_string();

    let conf = render("sentinel/sentinel.conf", &settings);
    assert!(conf.contains("sentinel monitor orders redis-primary 6379 3\n"));
    assert!(conf.contains("sentinel auth-pass orders s3cret\n"));
}

#[test]
fn test_twemproxy_pool_lists_both_shards() {
    let conf = render("twemproxy/nutcracker.yml", &StackSettings::default());
    assert!(conf.starts_with("shards:\n"));
    assert!(conf.contains("    - redis-shard-1:6379:1\n"));
    assert!(conf.contains("    - redis-shard-2:6379:1\n"));
    assert!(conf.contains("  redis_auth: 'redis'\n"));
}

#[test]
fn test_openssl_config_lists_extra_dns_names() {
    let mut settings = StackSettings::default();
    settings.tls.server_dns_names = vec!["redis-tls".to_string(), "cache.test".to_string()];

    let cnf = render("tls/openssl.cnf", &settings);
    assert!(cnf.contains("DNS.1 = localhost\n"));
    assert!(cnf.contains("DNS.2 = redis-tls\n"));
    assert!(cnf.contains("DNS.3 = cache.test\n"));
    assert!(cnf.contains("[ server_cert ]"));
    assert!(cnf.contains("[ client_cert ]"));
}

#[test]
fn test_compose_follows_bind_address_and_ports() {
    let mut settings = StackSettings::default();
    settings.bind_address = "0.0.0.0".to_string();
    settings.ports.sentinel = vec![36379, 36380, 36381];

    let compose = render("compose.yaml", &settings);
    assert!(compose.contains("\"0.0.0.0:5432:5432\""));
    assert!(compose.contains("\"0.0.0.0:36381:26379\""));
    assert!(compose.contains("./sentinel/sentinel-3:/usr/local/etc/redis-sentinel:Z"));
    assert!(!compose.contains("127.0.0.1"));
}

#[test]
fn test_compose_keeps_credentials_verbatim() {
    let mut settings = StackSettings::default();
    settings.credentials.postgres_password = "a&b<c>".to_string();
    settings.credentials.mariadb_password = "#s3cret".to_string();
    settings.credentials.mongo_root_password = "pa$$word".to_string();
    settings.credentials.mariadb_user = "no".to_string();

    let compose = render("compose.yaml", &settings);
    assert!(compose.contains("POSTGRES_PASSWORD: 'a&b<c>'\n"));
    assert!(compose.contains("MARIADB_PASSWORD: '#s3cret'\n"));
    assert!(compose.contains("MONGO_INITDB_ROOT_PASSWORD: 'pa$$$$word'\n"));
    assert!(compose.contains("MARIADB_USER: 'no'\n"));
    assert!(compose.contains("\"pg_isready\", \"-U\", 'app', \"-d\", 'app'"));

    for key in [
        "POSTGRES_USER",
        "POSTGRES_PASSWORD",
        "POSTGRES_DB",
        "MARIADB_ROOT_PASSWORD",
        "MARIADB_USER",
        "MARIADB_PASSWORD",
        "MARIADB_DATABASE",
        "MONGO_INITDB_ROOT_USERNAME",
        "MONGO_INITDB_ROOT_PASSWORD",
    ] {
        let line = compose
            .lines()
            .find(|l| l.trim_start().starts_with(&format!("{}:", key)))
            .unwrap_or_else(|| panic!("{} missing", key));
        let value = line.split_once(": ").map(|(_, v)| v).unwrap_or_default();
        assert!(value.starts_with('\'') && value.ends_with('\''), "{} is unquoted", line);
    }
}

#[test]
fn test_plan_renders_every_template() {
    let renderer = TemplateRenderer::from_embedded().expect("renderer");
    let plan = calculate_install_plan(
        Path::new("dev"),
        &StackSettings::default(),
        PlanOptions::default(),
    )
    .expect("plan");

    for op in &plan.ops {
        if let InstallOp::WriteFile { template, .. } = op {
            assert!(renderer.has_template(template), "unknown template {}", template);
        }
    }
    // One config per Sentinel plus eleven single files
    assert_eq!(plan.rendered_files().len(), 14);
}
