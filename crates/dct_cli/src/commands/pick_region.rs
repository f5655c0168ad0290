//! Pick-region command - Choose a region below the VPC limit.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dct_e2e::{E2eSettings, Ec2VpcCounter, RegionSelector};

#[derive(Args)]
pub struct PickRegionArgs {
    /// Report VPC usage for every candidate instead of picking one
    #[arg(long)]
    survey: bool,

    /// Comma-separated candidate regions (overrides settings)
    #[arg(long, value_delimiter = ',')]
    regions: Vec<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: PickRegionArgs, settings: &E2eSettings) -> Result<()> {
    let mut settings = settings.clone();
    if !args.regions.is_empty() {
        settings = settings.with_candidate_regions(args.regions);
    }

    let counter = Arc::new(Ec2VpcCounter::from_env().await);
    let selector = RegionSelector::from_settings(&settings, counter);

    if args.survey {
        info!("Surveying {} regions", selector.candidates().len());
        let usage = selector.survey().await.context("Failed to survey regions")?;

        if args.format == "json" {
            println!("{}", serde_json::to_string_pretty(&usage)?);
        } else {
            for entry in &usage {
                println!(
                    "{:<16} {:>3} VPCs  {}",
                    entry.region,
                    entry.vpc_count,
                    if entry.available { "available" } else { "at limit" }
                );
            }
        }
        return Ok(());
    }

    let region = selector.select().await?;
    println!("{}", region);
    Ok(())
}
