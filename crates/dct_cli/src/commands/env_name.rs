//! Env-name command - Print a unique environment name.

use anyhow::Result;
use clap::Args;

use dct_e2e::{environment_name, E2eSettings};

#[derive(Args)]
pub struct EnvNameArgs {
    /// Prefix to use instead of the configured one
    #[arg(short, long)]
    prefix: Option<String>,
}

pub fn execute(args: EnvNameArgs, settings: &E2eSettings) -> Result<()> {
    let prefix = args
        .prefix
        .as_deref()
        .unwrap_or(settings.environment_prefix.as_str());
    println!("{}", environment_name(prefix));
    Ok(())
}
