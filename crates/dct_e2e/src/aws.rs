//! EC2-backed VPC counting.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::region::VpcCounter;

/// Counts VPCs with `DescribeVpcs`, using the default credential chain.
pub struct Ec2VpcCounter {
    base: SdkConfig,
}

impl Ec2VpcCounter {
    /// Load credentials and defaults from the environment.
    pub async fn from_env() -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self { base }
    }

    pub fn from_config(base: SdkConfig) -> Self {
        Self { base }
    }

    fn client_for(&self, region: &str) -> aws_sdk_ec2::Client {
        let config = aws_sdk_ec2::config::Builder::from(&self.base)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(config)
    }
}

#[async_trait]
impl VpcCounter for Ec2VpcCounter {
    async fn vpc_count(&self, region: &str) -> E2eResult<usize> {
        let output = self
            .client_for(region)
            .describe_vpcs()
            .send()
            .await
            .map_err(|e| E2eError::VpcQuery {
                region: region.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let count = output.vpcs().len();
        debug!("{} has {} VPCs", region, count);
        Ok(count)
    }
}
