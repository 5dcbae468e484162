//! Type-safe arguments for `openssl` subcommands.
//!
//! | Struct        | Command |
//! |---------------|---------|
//! | `GenRsaArgs`  | `openssl genrsa` |
//! | `CaCertArgs`  | `openssl req -x509 -new` (self-signed CA) |
//! | `CsrArgs`     | `openssl req -new` |
//! | `SignCertArgs`| `openssl x509 -req` (sign a CSR with the CA) |

use std::path::PathBuf;

use crate::tool_traits::ToolArgs;
use crate::types::Tool;

/// Build an `-subj` string. Components are validated by `StackSettings::validate`.
pub fn subject(organization: &str, common_name: &str) -> String {
    format!("/O={}/CN={}", organization, common_name)
}

/// `openssl genrsa -out <out> <bits>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenRsaArgs {
    pub out: PathBuf,
    pub bits: u32,
}

impl ToolArgs for GenRsaArgs {
    fn tool(&self) -> Tool {
        Tool::Openssl
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "genrsa".to_string(),
            "-out".to_string(),
            self.out.display().to_string(),
            self.bits.to_string(),
        ]
    }
}

/// Self-signed CA certificate from an existing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaCertArgs {
    pub key: PathBuf,
    pub out: PathBuf,
    pub days: u32,
    pub subject: String,
}

impl ToolArgs for CaCertArgs {
    fn tool(&self) -> Tool {
        Tool::Openssl
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "req".to_string(),
            "-x509".to_string(),
            "-new".to_string(),
            "-nodes".to_string(),
            "-sha256".to_string(),
            "-key".to_string(),
            self.key.display().to_string(),
            "-days".to_string(),
            self.days.to_string(),
            "-subj".to_string(),
            self.subject.clone(),
            "-out".to_string(),
            self.out.display().to_string(),
        ]
    }
}

/// Certificate signing request for a leaf key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrArgs {
    pub key: PathBuf,
    pub out: PathBuf,
    pub subject: String,
}

impl ToolArgs for CsrArgs {
    fn tool(&self) -> Tool {
        Tool::Openssl
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "req".to_string(),
            "-new".to_string(),
            "-sha256".to_string(),
            "-key".to_string(),
            self.key.display().to_string(),
            "-subj".to_string(),
            self.subject.clone(),
            "-out".to_string(),
            self.out.display().to_string(),
        ]
    }
}

/// Sign a CSR with the CA, applying one extension section of `extfile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignCertArgs {
    pub csr: PathBuf,
    pub ca_cert: PathBuf,
    pub ca_key: PathBuf,
    /// Serial file, created on first use
    pub serial: PathBuf,
    pub days: u32,
    pub extfile: PathBuf,
    /// Section name in `extfile` (`server_cert` or `client_cert`)
    pub extensions: &'static str,
    pub out: PathBuf,
}

impl ToolArgs for SignCertArgs {
    fn tool(&self) -> Tool {
        Tool::Openssl
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "x509".to_string(),
            "-req".to_string(),
            "-sha256".to_string(),
            "-in".to_string(),
            self.csr.display().to_string(),
            "-CA".to_string(),
            self.ca_cert.display().to_string(),
            "-CAkey".to_string(),
            self.ca_key.display().to_string(),
            "-CAserial".to_string(),
            self.serial.display().to_string(),
            "-CAcreateserial".to_string(),
            "-days".to_string(),
            self.days.to_string(),
            "-extfile".to_string(),
            self.extfile.display().to_string(),
            "-extensions".to_string(),
            self.extensions.to_string(),
            "-out".to_string(),
            self.out.display().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_format() {
        assert_eq!(subject("Acme", "localhost"), "/O=Acme/CN=localhost");
    }

    #[test]
    fn test_ca_cert_args() {
        let args = CaCertArgs {
            key: PathBuf::from("tls/ca.key"),
            out: PathBuf::from("tls/ca.crt"),
            days: 3650,
            subject: subject("Acme", "Acme CA"),
        };
        let cli = args.to_cli_args();
        assert_eq!(&cli[..3], &["req", "-x509", "-new"]);
        assert!(cli.windows(2).any(|w| w == ["-days", "3650"]));
        assert!(cli.windows(2).any(|w| w == ["-subj", "/O=Acme/CN=Acme CA"]));
        assert_eq!(cli.last().map(String::as_str), Some("tls/ca.crt"));
    }

    #[test]
    fn test_sign_args_select_extension_section() {
        let args = SignCertArgs {
            csr: PathBuf::from("server.csr"),
            ca_cert: PathBuf::from("ca.crt"),
            ca_key: PathBuf::from("ca.key"),
            serial: PathBuf::from("ca.srl"),
            days: 825,
            extfile: PathBuf::from("openssl.cnf"),
            extensions: "server_cert",
            out: PathBuf::from("server.crt"),
        };
        let cli = args.to_cli_args();
        assert_eq!(&cli[..2], &["x509", "-req"]);
        assert!(cli.windows(2).any(|w| w == ["-extensions", "server_cert"]));
        assert!(cli.windows(2).any(|w| w == ["-extfile", "openssl.cnf"]));
        assert!(cli.contains(&"-CAcreateserial".to_string()));
        assert!(args.is_mutating());
    }
}
