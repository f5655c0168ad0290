//! CLI command definitions.
//!
//! Each subcommand maps to one step of preparing, checking or running a
//! Data Center test deployment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod env_name;
pub mod install;
pub mod lint;
pub mod pick_region;
pub mod plan_check;
pub mod render;

/// dc-testkit - Terraform test scaffolding for Atlassian Data Center
#[derive(Parser)]
#[command(name = "dctest")]
#[command(version, about = "dc-testkit - Terraform test scaffolding for Atlassian Data Center")]
#[command(long_about = r#"
dc-testkit prepares and checks Terraform deployments of Atlassian Data Center
products on AWS: it picks a region with spare VPC capacity, renders the test
tfvars file, asserts on module plans and drives full install runs.

COMMANDS:
  env-name     → Print a fresh unique environment name
  pick-region  → Pick a region below the VPC limit (or survey all candidates)
  render       → Render the test configuration file
  plan-check   → Plan a product module and assert on its helm releases
  lint         → Check a variables file against the supported AWS catalog
  install      → Install, verify and destroy a full environment

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Assertion failure
  4 - Template error
  5 - IaC error
  6 - Region selection error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (YAML)
    #[arg(long, global = true, env = "DCTEST_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a unique environment name
    #[command(name = "env-name")]
    EnvName(env_name::EnvNameArgs),

    /// Pick an AWS region with spare VPC capacity
    #[command(name = "pick-region")]
    PickRegion(pick_region::PickRegionArgs),

    /// Render the test configuration file
    Render(render::RenderArgs),

    /// Plan a product module and verify its helm releases
    #[command(name = "plan-check")]
    PlanCheck(plan_check::PlanCheckArgs),

    /// Lint a variables file against the supported AWS catalog
    Lint(lint::LintArgs),

    /// Install, verify and destroy an environment
    Install(install::InstallArgs),
}
