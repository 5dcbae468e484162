use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Podstack - provision a local podman-compose development environment
#[derive(Parser, Debug)]
#[command(name = "podstack")]
#[command(about = "Generate a podman-compose development environment with databases, caches and Redis topologies")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Installation directory (prompted for when omitted)
    pub target: Option<PathBuf>,

    /// Answer yes to every prompt; uses the default directory when no target is given
    #[arg(short, long)]
    pub yes: bool,

    /// JSON settings file overriding the built-in defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reissue the certificate chain even if one already exists
    #[arg(long)]
    pub renew_certs: bool,

    /// Dry-run mode: show what would be done without touching the filesystem.
    ///
    /// Templates are still rendered so errors surface, but nothing is
    /// written and no openssl or podman command is executed.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that podman, podman-compose and openssl are installed
    Check,
    /// List the embedded templates
    Templates,
    /// Render one template to stdout
    Render {
        /// Template name, e.g. compose.yaml or redis-tls/redis.conf
        name: String,
        /// JSON settings file overriding the built-in defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a settings file
    Validate {
        /// Path to the settings file
        config: PathBuf,
    },
    /// (Re)issue the TLS certificate chain of an existing installation
    Certs {
        /// Installation directory
        #[arg(default_value = "podstack-env")]
        target: PathBuf,
        /// JSON settings file overriding the built-in defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Tracing filter directive implied by `-v`
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
