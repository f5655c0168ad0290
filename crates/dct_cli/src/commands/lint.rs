//! Lint command - Check variables against the supported AWS catalog.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dct_e2e::lint_variables;
use dct_iac::VariableMap;

#[derive(Args)]
pub struct LintArgs {
    /// Variables file in JSON (.tfvars.json)
    file: PathBuf,
}

pub fn execute(args: LintArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {:?}", args.file))?;
    let vars: VariableMap = serde_json::from_str(&content)
        .with_context(|| format!("{:?} is not a JSON object of variables", args.file))?;

    let warnings = lint_variables(&vars);
    if warnings.is_empty() {
        println!("No catalog warnings");
    }
    for warning in &warnings {
        println!("warning: {}", warning);
    }
    Ok(())
}
