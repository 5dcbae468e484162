//! Podstack library
//!
//! Core of the podstack installer: dependency checks, settings, embedded
//! templates, the install plan and its executor.

pub mod certs;
pub mod cli;
pub mod engine;
pub mod error;
pub mod installer;
pub mod permissions;
pub mod process_guard;
pub mod prompt;
pub mod sanity;
pub mod settings;
pub mod templates;
pub mod tool_runner;
pub mod tool_traits;
pub mod tools;
pub mod types;

pub use certs::{issue_certificates, CertOutcome, TlsPaths};
pub use engine::plan::{
    calculate_certificate_plan, calculate_install_plan, InstallOp, InstallPlan, PlanOptions,
};
pub use error::{PodstackError, Result};
pub use installer::{InstallOptions, InstallSummary, Installer, Outcome, DEFAULT_TARGET_DIR};
pub use process_guard::{ChildRegistry, CommandProcessGroup};
pub use sanity::{verify_environment, SanityCheckResult, Toolchain};
pub use settings::StackSettings;
pub use templates::TemplateRenderer;
pub use tool_runner::{run_tool_safe, ToolOutput};
pub use tool_traits::{enable_dry_run, is_dry_run, ToolArgs};
pub use types::{DataService, Tool};
