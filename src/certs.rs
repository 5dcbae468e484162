//! Self-signed certificate chain for the TLS Redis instance.
//!
//! The chain is a CA plus one server and one client certificate, each
//! produced by a separate `openssl` call. Leaf certificates take their
//! extensions from the rendered `tls/openssl.cnf`.

use std::path::{Path, PathBuf};

use crate::error::{PodstackError, Result};
use crate::sanity::Toolchain;
use crate::settings::TlsSettings;
use crate::tool_runner::run_tool_safe;
use crate::tool_traits::{is_dry_run, ToolArgs};
use crate::tools::openssl::{subject, CaCertArgs, CsrArgs, GenRsaArgs, SignCertArgs};

/// Every file the certificate step reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub dir: PathBuf,
    pub openssl_cnf: PathBuf,
    pub ca_key: PathBuf,
    pub ca_cert: PathBuf,
    pub ca_serial: PathBuf,
    pub server_key: PathBuf,
    pub server_csr: PathBuf,
    pub server_cert: PathBuf,
    pub client_key: PathBuf,
    pub client_csr: PathBuf,
    pub client_cert: PathBuf,
}

impl TlsPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            openssl_cnf: dir.join("openssl.cnf"),
            ca_key: dir.join("ca.key"),
            ca_cert: dir.join("ca.crt"),
            ca_serial: dir.join("ca.srl"),
            server_key: dir.join("server.key"),
            server_csr: dir.join("server.csr"),
            server_cert: dir.join("server.crt"),
            client_key: dir.join("client.key"),
            client_csr: dir.join("client.csr"),
            client_cert: dir.join("client.crt"),
        }
    }

    /// The six files a finished chain consists of
    pub fn outputs(&self) -> [&Path; 6] {
        [
            &self.ca_key,
            &self.ca_cert,
            &self.server_key,
            &self.server_cert,
            &self.client_key,
            &self.client_cert,
        ]
    }

    /// Chain files that do not exist yet
    pub fn missing_outputs(&self) -> Vec<String> {
        self.outputs()
            .iter()
            .filter(|p| !p.exists())
            .map(|p| p.display().to_string())
            .collect()
    }

    /// Intermediate files removed once the leaves are signed
    pub fn scratch(&self) -> [&Path; 2] {
        [&self.server_csr, &self.client_csr]
    }
}

/// What the certificate step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertOutcome {
    Issued,
    KeptExisting,
}

/// Ordered `openssl` invocations that produce the chain
pub fn certificate_commands(paths: &TlsPaths, tls: &TlsSettings) -> Vec<Box<dyn ToolArgs>> {
    let org = tls.organization.as_str();
    let mut steps: Vec<Box<dyn ToolArgs>> = vec![
        Box::new(GenRsaArgs {
            out: paths.ca_key.clone(),
            bits: tls.ca_key_bits,
        }),
        Box::new(CaCertArgs {
            key: paths.ca_key.clone(),
            out: paths.ca_cert.clone(),
            days: tls.ca_days,
            subject: subject(org, &tls.ca_common_name),
        }),
    ];

    let leaves = [
        (
            &paths.server_key,
            &paths.server_csr,
            &paths.server_cert,
            &tls.server_common_name,
            "server_cert",
        ),
        (
            &paths.client_key,
            &paths.client_csr,
            &paths.client_cert,
            &tls.client_common_name,
            "client_cert",
        ),
    ];

    for (key, csr, cert, common_name, extensions) in leaves {
        steps.push(Box::new(GenRsaArgs {
            out: key.clone(),
            bits: tls.key_bits,
        }));
        steps.push(Box::new(CsrArgs {
            key: key.clone(),
            out: csr.clone(),
            subject: subject(org, common_name),
        }));
        steps.push(Box::new(SignCertArgs {
            csr: csr.clone(),
            ca_cert: paths.ca_cert.clone(),
            ca_key: paths.ca_key.clone(),
            serial: paths.ca_serial.clone(),
            days: tls.cert_days,
            extfile: paths.openssl_cnf.clone(),
            extensions,
            out: cert.clone(),
        }));
    }

    steps
}

/// Issue the CA, server and client certificates.
///
/// A complete existing chain is kept unless `renew` is set, so re-running
/// the installer does not invalidate certificates clients already trust.
/// A chain with any file missing is reissued from scratch.
/// Any `openssl` failure aborts.
pub fn issue_certificates(
    toolchain: &Toolchain,
    paths: &TlsPaths,
    tls: &TlsSettings,
    renew: bool,
) -> Result<CertOutcome> {
    if !renew && paths.ca_cert.exists() {
        let missing = paths.missing_outputs();
        if missing.is_empty() {
            tracing::info!(
                "Keeping existing certificate chain in {} (use --renew-certs to reissue)",
                paths.dir.display()
            );
            return Ok(CertOutcome::KeptExisting);
        }
        tracing::warn!(
            "Certificate chain in {} is incomplete (missing {}), reissuing it",
            paths.dir.display(),
            missing.join(", ")
        );
    }

    if !is_dry_run() && !paths.openssl_cnf.exists() {
        return Err(PodstackError::validation(format!(
            "{} must be rendered before issuing certificates",
            paths.openssl_cnf.display()
        )));
    }

    tracing::info!("Issuing certificate chain in {}", paths.dir.display());
    for step in certificate_commands(paths, tls) {
        let output = run_tool_safe(toolchain, step.as_ref())?;
        output.ensure_success(&step.display())?;
    }

    if is_dry_run() {
        return Ok(CertOutcome::Issued);
    }

    for scratch in paths.scratch() {
        if scratch.exists() {
            std::fs::remove_file(scratch)?;
        }
    }

    let missing = paths.missing_outputs();
    if !missing.is_empty() {
        return Err(PodstackError::tool(format!(
            "openssl reported success but did not produce: {}",
            missing.join(", ")
        )));
    }

    tracing::info!("Certificate chain issued");
    Ok(CertOutcome::Issued)
}
