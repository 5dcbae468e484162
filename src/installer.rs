//! Installation orchestration.
//!
//! `Installer` resolves the target directory, asks for confirmation, and
//! executes an `InstallPlan` step by step. The first failing step aborts the
//! run; the only tolerated failure is the ownership change.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::certs::{issue_certificates, CertOutcome, TlsPaths};
use crate::engine::plan::{calculate_install_plan, InstallOp, InstallPlan, PlanOptions};
use crate::error::{PodstackError, Result};
use crate::permissions::{apply_mode, change_owner, ChownOutcome};
use crate::prompt;
use crate::sanity::Toolchain;
use crate::settings::StackSettings;
use crate::templates::TemplateRenderer;
use crate::tool_traits::is_dry_run;

/// Directory used when none is given and the prompt is skipped or left empty
pub const DEFAULT_TARGET_DIR: &str = "podstack-env";

/// Caller-provided knobs for one run
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Target from the command line; prompted for when absent
    pub target: Option<PathBuf>,
    /// Skip the prompts (`--yes`)
    pub assume_yes: bool,
    pub renew_certs: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed(InstallSummary),
    Cancelled,
}

/// Result of executing a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    pub target: PathBuf,
    pub files_written: usize,
    pub certificates: Option<CertOutcome>,
    /// Ownership changes that failed, with the reason
    pub ownership_warnings: Vec<(PathBuf, String)>,
}

pub struct Installer {
    toolchain: Toolchain,
    renderer: TemplateRenderer,
    settings: StackSettings,
}

impl Installer {
    pub fn new(toolchain: Toolchain, settings: StackSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            toolchain,
            renderer: TemplateRenderer::from_embedded()?,
            settings,
        })
    }

    /// Full interactive run: resolve target, confirm, execute, report.
    pub fn run<R: BufRead, W: Write>(
        &self,
        options: &InstallOptions,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome> {
        let target = match &options.target {
            Some(target) => target.clone(),
            None if options.assume_yes => PathBuf::from(DEFAULT_TARGET_DIR),
            None => prompt::prompt_target(input, output, DEFAULT_TARGET_DIR)?,
        };
        tracing::info!("Installation directory: {}", target.display());

        if target.exists() && !target.is_dir() {
            return Err(PodstackError::validation(format!(
                "'{}' exists and is not a directory",
                target.display()
            )));
        }

        if !options.assume_yes {
            let question = confirmation_question(&target)?;
            if !prompt::confirm(input, output, &question)? {
                writeln!(output, "Installation cancelled.")?;
                tracing::info!("Installation cancelled by user");
                return Ok(Outcome::Cancelled);
            }
        }

        let plan = calculate_install_plan(
            &target,
            &self.settings,
            PlanOptions {
                renew_certs: options.renew_certs,
            },
        )?;
        tracing::debug!("{}", plan.summary());

        let summary = self.execute(&plan)?;
        print_next_steps(output, &summary, &self.settings)?;
        Ok(Outcome::Installed(summary))
    }

    /// Execute every operation of `plan` in order.
    pub fn execute(&self, plan: &InstallPlan) -> Result<InstallSummary> {
        let base_context = self.settings.to_context()?;
        let dry_run = is_dry_run();

        let mut summary = InstallSummary {
            target: plan.target.clone(),
            files_written: 0,
            certificates: None,
            ownership_warnings: Vec::new(),
        };

        for op in &plan.ops {
            tracing::debug!("executing {}", op);
            match op {
                InstallOp::CreateDir { path } => {
                    if dry_run {
                        tracing::info!("[dry-run] would create {}", path.display());
                        continue;
                    }
                    std::fs::create_dir_all(path)?;
                }
                InstallOp::WriteFile { path, template, vars } => {
                    let mut context = base_context.clone();
                    for (key, value) in vars {
                        context.insert(key.as_str(), value);
                    }
                    let rendered = self.renderer.render(template, &context)?;
                    if dry_run {
                        tracing::info!(
                            "[dry-run] would write {} ({} bytes)",
                            path.display(),
                            rendered.len()
                        );
                        continue;
                    }
                    write_fresh(path, &rendered)?;
                    summary.files_written += 1;
                }
                InstallOp::IssueCertificates { tls_dir, renew } => {
                    let outcome = issue_certificates(
                        &self.toolchain,
                        &TlsPaths::new(tls_dir),
                        &self.settings.tls,
                        *renew,
                    )?;
                    summary.certificates = Some(outcome);
                }
                InstallOp::SetMode { path, mode, dir_mode, recursive } => {
                    if dry_run {
                        tracing::info!("[dry-run] would chmod {:o} {}", mode, path.display());
                        continue;
                    }
                    apply_mode(path, *mode, *dir_mode, *recursive)?;
                }
                InstallOp::ChangeOwner { path, uid, gid } => {
                    if let ChownOutcome::Skipped(reason) =
                        change_owner(&self.toolchain, path, *uid, *gid)
                    {
                        summary.ownership_warnings.push((path.clone(), reason));
                    }
                }
            }
        }

        tracing::info!(
            "Wrote {} file(s) to {}",
            summary.files_written,
            plan.target.display()
        );
        Ok(summary)
    }
}

/// Pick the question for the confirmation prompt
fn confirmation_question(target: &Path) -> Result<String> {
    let non_empty = target.is_dir() && std::fs::read_dir(target)?.next().is_some();
    Ok(if non_empty {
        format!(
            "Directory '{}' is not empty. Generated files will be overwritten. Continue?",
            target.display()
        )
    } else {
        format!("Install development environment into '{}'?", target.display())
    })
}

/// Replace `path` with `content`. The old file is unlinked first, since it
/// may belong to a container user after a previous run.
fn write_fresh(path: &Path, content: &str) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn print_next_steps<W: Write>(
    output: &mut W,
    summary: &InstallSummary,
    settings: &StackSettings,
) -> Result<()> {
    if is_dry_run() {
        writeln!(output, "Dry run complete; nothing was written to {}.", summary.target.display())?;
        return Ok(());
    }

    writeln!(output, "✓ Development environment written to {}", summary.target.display())?;
    if summary.certificates == Some(CertOutcome::KeptExisting) {
        writeln!(output, "  Kept the existing certificate chain (use --renew-certs to reissue).")?;
    }
    for (path, reason) in &summary.ownership_warnings {
        writeln!(output, "⚠ Could not change ownership of {}: {}", path.display(), reason)?;
        writeln!(
            output,
            "  Containers may fail to write their data. Fix it with:\n    podman unshare chown -R {}:{} {}",
            settings.container_uid,
            settings.container_gid,
            path.display()
        )?;
    }
    writeln!(output)?;
    writeln!(output, "Next steps:")?;
    writeln!(output, "  cd {}", summary.target.display())?;
    writeln!(output, "  podman-compose up -d")?;
    Ok(())
}
