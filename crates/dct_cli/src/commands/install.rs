//! Install command - Install, verify and destroy a full environment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use dct_e2e::metadata::is_known_region;
use dct_e2e::{ConfigRenderer, E2eSettings, Ec2VpcCounter, Installer, PageClient, RegionSelector};
use dct_iac::ProductList;
use dct_runner::{ProcessRunner, ProcessRunnerOptions};

#[derive(Args)]
pub struct InstallArgs {
    /// Comma-separated products, e.g. jira,bamboo
    #[arg(short, long)]
    products: String,

    /// Installer root module
    #[arg(short, long, default_value = ".")]
    install_dir: PathBuf,

    /// Use this region instead of picking one
    #[arg(short, long)]
    region: Option<String>,

    /// Timeout for each terraform command, in seconds
    #[arg(long, default_value_t = 3600)]
    timeout: u64,

    /// Timeout for each product page request, in seconds
    #[arg(long, default_value_t = 60)]
    http_timeout: u64,
}

pub async fn execute(args: InstallArgs, settings: E2eSettings) -> Result<()> {
    let products = ProductList::parse_csv(&args.products)?;
    let domain = settings.domain.clone();
    let renderer = ConfigRenderer::new(settings);

    let config = match args.region {
        Some(region) => {
            if !is_known_region(&region) {
                warn!("region '{}' is not a supported region", region);
            }
            renderer.render(region, &products)?
        }
        None => {
            let counter = Arc::new(Ec2VpcCounter::from_env().await);
            let selector = RegionSelector::from_settings(renderer.settings(), counter);
            renderer.create_config(&selector, &products).await?
        }
    };
    info!(
        "Rendered {:?} for {} in {}",
        config.config_path, config.environment_name, config.aws_region
    );

    let runner = Arc::new(ProcessRunner::new(ProcessRunnerOptions::new().ci_mode()));
    let installer = Installer::new(runner, &args.install_dir, domain)
        .with_http(PageClient::new(Duration::from_secs(args.http_timeout))?)
        .with_timeout(args.timeout);

    let checks = installer
        .run(&config)
        .await
        .with_context(|| format!("Install run for {} failed", config.environment_name))?;

    for check in &checks {
        println!("{:<12} {} ({} bytes)", check.product.as_str(), check.url, check.bytes);
    }
    println!("All {} products answered", checks.len());
    Ok(())
}
