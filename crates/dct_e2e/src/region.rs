//! Region selection under a VPC limit.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::settings::{E2eSettings, RetryPolicy};

/// Counts the VPCs that already exist in a region.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VpcCounter: Send + Sync {
    async fn vpc_count(&self, region: &str) -> E2eResult<usize>;
}

/// Chooses the next region to try.
pub trait RegionPicker: Send + Sync {
    fn pick(&self, candidates: &[String]) -> Option<String>;
}

/// Uniform random choice over the candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRegionPicker;

impl RegionPicker for RandomRegionPicker {
    fn pick(&self, candidates: &[String]) -> Option<String> {
        candidates.choose(&mut rand::thread_rng()).cloned()
    }
}

/// VPC count observed in a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcUsage {
    pub region: String,
    pub vpc_count: usize,
    pub available: bool,
}

/// Picks a region with fewer VPCs than the ceiling, within a bounded number
/// of attempts.
pub struct RegionSelector {
    candidates: Vec<String>,
    vpc_ceiling: usize,
    retry: RetryPolicy,
    picker: Box<dyn RegionPicker>,
    counter: Arc<dyn VpcCounter>,
}

impl RegionSelector {
    pub fn new(candidates: Vec<String>, counter: Arc<dyn VpcCounter>) -> Self {
        Self {
            candidates,
            vpc_ceiling: 4,
            retry: RetryPolicy::default(),
            picker: Box::new(RandomRegionPicker),
            counter,
        }
    }

    /// Selector using the candidates, ceiling and retry policy from `settings`.
    pub fn from_settings(settings: &E2eSettings, counter: Arc<dyn VpcCounter>) -> Self {
        Self::new(settings.candidate_regions.clone(), counter)
            .with_ceiling(settings.vpc_ceiling)
            .with_retry(settings.retry.clone())
    }

    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.vpc_ceiling = ceiling;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_picker(mut self, picker: impl RegionPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Sample regions until one is below the VPC ceiling.
    ///
    /// Within a sweep each candidate is tried at most once. The retry delay
    /// applies only after every candidate has been found saturated, and the
    /// next sweep starts over with all of them. Only saturation is retried;
    /// a failed VPC query returns immediately.
    pub async fn select(&self) -> E2eResult<String> {
        if self.candidates.is_empty() {
            return Err(E2eError::NoCandidateRegions);
        }

        let max_attempts = self.retry.max_attempts.max(1);
        let mut saturated: HashSet<&str> = HashSet::new();
        let mut sweep = 0;

        for attempt in 1..=max_attempts {
            let remaining: Vec<String> = self
                .candidates
                .iter()
                .filter(|c| !saturated.contains(c.as_str()))
                .cloned()
                .collect();
            let region = self
                .picker
                .pick(&remaining)
                .ok_or(E2eError::NoCandidateRegions)?;

            let count = self.counter.vpc_count(&region).await?;
            if count < self.vpc_ceiling {
                info!(
                    "Selected region {} ({} VPCs, attempt {})",
                    region, count, attempt
                );
                return Ok(region);
            }

            warn!(
                "{} has reached resource limit ({} VPCs), finding new region",
                region, count
            );
            if let Some(candidate) = self.candidates.iter().find(|c| **c == region) {
                saturated.insert(candidate.as_str());
            }

            let all_saturated = self
                .candidates
                .iter()
                .all(|c| saturated.contains(c.as_str()));
            if all_saturated && attempt < max_attempts {
                sweep += 1;
                saturated.clear();
                let delay = self.retry.delay_for(sweep);
                if !delay.is_zero() {
                    debug!("All candidates saturated, waiting {:?}", delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(E2eError::RegionExhausted {
            attempts: max_attempts,
        })
    }

    /// VPC usage of every candidate region, in candidate order.
    pub async fn survey(&self) -> E2eResult<Vec<VpcUsage>> {
        let mut usage = Vec::with_capacity(self.candidates.len());
        for region in &self.candidates {
            let vpc_count = self.counter.vpc_count(region).await?;
            usage.push(VpcUsage {
                region: region.clone(),
                vpc_count,
                available: vpc_count < self.vpc_ceiling,
            });
        }
        Ok(usage)
    }
}
