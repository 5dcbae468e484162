//! Podstack - main entry point
//!
//! Checks the host for podman, podman-compose and openssl, then writes a
//! ready-to-run development environment into the chosen directory.

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use podstack::cli::{Cli, Commands};
use podstack::engine::plan::calculate_certificate_plan;
use podstack::installer::{InstallOptions, Installer, Outcome};
use podstack::sanity::{self, run_preflight_checks};
use podstack::settings::StackSettings;
use podstack::templates::TemplateRenderer;
use podstack::{enable_dry_run, process_guard};

/// Initialize tracing. `RUST_LOG` overrides the level picked by `-v`.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level());
    tracing::debug!("podstack {} starting", env!("CARGO_PKG_VERSION"));

    // Children (openssl, podman) are terminated if we receive SIGINT/SIGTERM
    if let Err(e) = process_guard::init_signal_handlers() {
        tracing::warn!("Failed to initialize signal handlers: {}", e);
    }

    if cli.dry_run {
        enable_dry_run();
        tracing::info!("Dry-run mode enabled");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => install(&cli),
        Some(Commands::Check) => {
            let result = sanity::verify_environment();
            match result.require_toolchain() {
                Ok(toolchain) => {
                    println!("✓ podman: {}", toolchain.podman.display());
                    println!("✓ podman-compose: {}", toolchain.podman_compose.display());
                    println!("✓ openssl: {}", toolchain.openssl.display());
                    Ok(())
                }
                Err(_) => sanity::print_error_and_exit(&result),
            }
        }
        Some(Commands::Templates) => {
            let renderer = TemplateRenderer::from_embedded()?;
            for name in renderer.list_templates() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Render { ref name, ref config }) => {
            let settings = load_settings(config.as_deref())?;
            let renderer = TemplateRenderer::from_embedded()?;
            let mut context = settings.to_context()?;
            context.insert("sentinel_name", "sentinel-1");
            print!("{}", renderer.render(name, &context)?);
            Ok(())
        }
        Some(Commands::Validate { ref config }) => {
            let settings = StackSettings::load_from_file(config)?;
            settings
                .validate()
                .with_context(|| format!("{} is not valid", config.display()))?;
            println!("✓ Settings file is valid: {}", config.display());
            Ok(())
        }
        Some(Commands::Certs { ref target, ref config }) => {
            let toolchain = run_preflight_checks();
            let settings = load_settings(config.as_deref())?;
            let plan = calculate_certificate_plan(target, &settings)?;
            let installer = Installer::new(toolchain, settings)?;
            installer.execute(&plan)?;
            println!("✓ Certificate chain issued in {}", target.join("tls").display());
            Ok(())
        }
    }
}

fn install(cli: &Cli) -> anyhow::Result<()> {
    // Missing dependencies exit with status 1 before any prompt
    let toolchain = run_preflight_checks();
    let settings = load_settings(cli.config.as_deref())?;
    let installer = Installer::new(toolchain, settings)?;

    let options = InstallOptions {
        target: cli.target.clone(),
        assume_yes: cli.yes,
        renew_certs: cli.renew_certs,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    match installer.run(&options, &mut input, &mut output)? {
        Outcome::Installed(summary) => {
            tracing::info!("Installed into {}", summary.target.display());
        }
        Outcome::Cancelled => {}
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<StackSettings> {
    let settings = StackSettings::load_or_default(path)?;
    settings.validate().context("invalid settings")?;
    Ok(settings)
}
