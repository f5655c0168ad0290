//! Plan-check command - Plan a product module and verify its releases.
//!
//! Plans `<modules-root>/products/<product>` with the product's fixture
//! variables and checks the expected helm releases in the planned values.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dct_iac::{Product, ProductSuite, ReleaseExpectation, TerraformRunner, VariableMap};
use dct_runner::{ProcessRunner, ProcessRunnerOptions};

#[derive(Args)]
pub struct PlanCheckArgs {
    /// Product module to plan
    #[arg(short, long)]
    pub product: String,

    /// Directory containing the `products/` modules
    #[arg(short, long)]
    modules_root: PathBuf,

    /// Variables file (JSON) replacing the built-in fixture
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Release expectations file (YAML) replacing the built-in ones
    #[arg(long)]
    expectations: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: PlanCheckArgs) -> Result<()> {
    let product: Product = args.product.parse()?;
    let mut suite = ProductSuite::for_product(product);

    if let Some(path) = &args.vars {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let vars: VariableMap = serde_json::from_str(&content)
            .with_context(|| format!("Invalid variables file {:?}", path))?;
        suite = suite.with_variables(vars);
    }

    if let Some(path) = &args.expectations {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let releases: Vec<ReleaseExpectation> = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid expectations file {:?}", path))?;
        suite = suite.with_releases(releases);
    }

    let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new(
        ProcessRunnerOptions::new().ci_mode(),
    )));
    terraform.ensure_available().await?;

    info!("Checking plan for {}", product);
    let report = suite
        .run(&terraform, &args.modules_root)
        .await
        .with_context(|| format!("Plan check for {} could not run", product))?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            let mark = if check.passed { "ok  " } else { "FAIL" };
            println!("{} {} {}", mark, check.name, check.message);
        }
        println!();
        println!(
            "{}/{} checks passed",
            report.checks.iter().filter(|c| c.passed).count(),
            report.checks.len()
        );
    }

    report.into_result()?;
    Ok(())
}
