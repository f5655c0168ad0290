//! Run settings.
//!
//! Everything the helpers would otherwise hard-code (owner tag, domain,
//! compiled-in licenses, candidate regions, limits) lives here and is passed
//! in explicitly. Every field has a default, so a settings file only needs
//! the values it changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use dct_iac::Product;

use crate::error::{E2eError, E2eResult};

/// Backoff between region attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of regions sampled before giving up
    pub max_attempts: u32,
    /// Delay after the first saturated region, doubled on each attempt
    pub base_delay_ms: u64,
    /// Upper bound for a single delay
    pub max_delay_ms: u64,
    /// Wait a uniform random fraction of the computed delay
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Retry without waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter: false,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let ceiling = self
            .base_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_delay_ms);

        let millis = if self.jitter && ceiling > 0 {
            rand::thread_rng().gen_range(0..=ceiling)
        } else {
            ceiling
        };
        Duration::from_millis(millis)
    }
}

/// Settings for rendering configs and selecting regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eSettings {
    /// Value of the `resource_owner` tag
    pub resource_owner: String,
    /// Domain the products are exposed under
    pub domain: String,
    /// Prefix of generated environment names
    pub environment_prefix: String,
    /// Compiled-in licenses; an empty or absent entry falls back to the environment
    pub licenses: BTreeMap<Product, String>,
    /// Regions the selector samples from
    pub candidate_regions: Vec<String>,
    /// A region is usable while it has fewer VPCs than this
    pub vpc_ceiling: usize,
    pub retry: RetryPolicy,
    /// Template rendered into the tfvars file
    pub template_path: PathBuf,
    /// Where the rendered tfvars file is written
    pub output_path: PathBuf,
}

impl Default for E2eSettings {
    fn default() -> Self {
        Self {
            resource_owner: "dc-deployment".to_string(),
            domain: "deplops.com".to_string(),
            environment_prefix: "e2etest-".to_string(),
            licenses: BTreeMap::new(),
            candidate_regions: [
                "us-east-1",
                "us-east-2",
                "us-west-1",
                "us-west-2",
                "af-south-1",
                "ap-east-1",
                "ap-northeast-2",
                "ap-southeast-2",
                "ap-northeast-3",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
            vpc_ceiling: 4,
            retry: RetryPolicy::default(),
            template_path: PathBuf::from("test-config.tfvars.tmpl"),
            output_path: PathBuf::from("test-config.tfvars"),
        }
    }
}

impl E2eSettings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> E2eResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        settings.validate()?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> E2eResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.candidate_regions.is_empty() {
            return Err(E2eError::NoCandidateRegions);
        }
        if self.vpc_ceiling == 0 {
            return Err(E2eError::Settings(
                "vpc_ceiling must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(E2eError::Settings(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiled-in license for `product`, empty when none is set.
    pub fn compiled_license(&self, product: Product) -> &str {
        self.licenses.get(&product).map(String::as_str).unwrap_or("")
    }

    pub fn with_license(mut self, product: Product, license: impl Into<String>) -> Self {
        self.licenses.insert(product, license.into());
        self
    }

    pub fn with_candidate_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_paths(mut self, template: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.template_path = template.into();
        self.output_path = output.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = E2eSettings::default();
        assert_eq!(settings.resource_owner, "dc-deployment");
        assert_eq!(settings.vpc_ceiling, 4);
        assert_eq!(settings.candidate_regions.len(), 9);
        assert_eq!(settings.compiled_license(Product::Bamboo), "");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
domain: example.org
licenses:
  confluence: "AAAB-compiled"
candidate_regions: [eu-west-1, eu-west-2]
retry:
  max_attempts: 3
"#;
        let settings: E2eSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.domain, "example.org");
        assert_eq!(settings.resource_owner, "dc-deployment");
        assert_eq!(settings.compiled_license(Product::Confluence), "AAAB-compiled");
        assert_eq!(settings.candidate_regions, vec!["eu-west-1", "eu-west-2"]);
        assert_eq!(settings.retry.max_attempts, 3);
        assert!(settings.retry.jitter);
    }

    #[test]
    fn test_load_rejects_empty_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "candidate_regions: []\n").unwrap();

        let err = E2eSettings::load(&path).unwrap_err();
        assert!(matches!(err, E2eError::NoCandidateRegions));
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay_ms: 100,
            max_delay_ms: 500,
            jitter: false,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for(60), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_within_ceiling() {
        let policy = RetryPolicy {
            jitter: true,
            ..RetryPolicy::default()
        };
        for attempt in 1..10 {
            assert!(policy.delay_for(attempt) <= Duration::from_millis(policy.max_delay_ms));
        }
        assert_eq!(RetryPolicy::immediate(5).delay_for(3), Duration::ZERO);
    }
}
