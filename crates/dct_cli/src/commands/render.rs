//! Render command - Render the test configuration file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dct_e2e::{write_default_template, ConfigRenderer, E2eSettings, Ec2VpcCounter, RegionSelector};
use dct_iac::ProductList;

#[derive(Args)]
pub struct RenderArgs {
    /// Comma-separated products, e.g. jira,bamboo
    #[arg(short, long)]
    products: String,

    /// Use this region instead of picking one
    #[arg(short, long)]
    region: Option<String>,

    /// Template path (overrides settings)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output path (overrides settings)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the bundled template first if the template path does not exist
    #[arg(long)]
    write_template: bool,
}

pub async fn execute(args: RenderArgs, settings: E2eSettings) -> Result<()> {
    let template = args.template.unwrap_or_else(|| settings.template_path.clone());
    let output = args.output.unwrap_or_else(|| settings.output_path.clone());
    let settings = settings.with_paths(&template, &output);

    if args.write_template && write_default_template(&template)? {
        info!("Wrote bundled template to {:?}", template);
    }

    let products = ProductList::parse_csv(&args.products)?;
    let renderer = ConfigRenderer::new(settings);

    let config = match args.region {
        Some(region) => renderer.render(region, &products)?,
        None => {
            let counter = Arc::new(Ec2VpcCounter::from_env().await);
            let selector = RegionSelector::from_settings(renderer.settings(), counter);
            renderer
                .create_config(&selector, &products)
                .await
                .context("Failed to create test configuration")?
        }
    };

    info!("{:?}", config);
    println!("environment_name: {}", config.environment_name);
    println!("region:           {}", config.aws_region);
    println!("config:           {}", config.config_path.display());
    Ok(())
}
