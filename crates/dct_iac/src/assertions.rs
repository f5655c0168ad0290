//! Assertions over a parsed plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{IacError, IacResult};
use crate::plan::{Plan, PlannedResource};
use crate::suite::HELM_CHARTS_REPOSITORY;

/// A single failed expectation against a plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertionError {
    #[error("resource '{key}' not found in planned values (planned: {planned})")]
    MissingResource { key: String, planned: String },

    #[error("resource '{key}' attribute '{attribute}': expected {expected}, actual {actual}")]
    AttributeMismatch {
        key: String,
        attribute: String,
        expected: Value,
        actual: String,
    },
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<not set>".to_string(),
    }
}

/// Expected attribute values for one resource in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseExpectation {
    /// Resource address, e.g. `helm_release.bamboo`
    pub key: String,
    /// Attribute name to expected value
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl ReleaseExpectation {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// A deployed release of `chart` from the Data Center helm repository.
    pub fn helm(key: impl Into<String>, chart: impl Into<String>) -> Self {
        Self::new(key)
            .with_attribute("status", "deployed")
            .with_attribute("chart", chart.into())
            .with_attribute("repository", HELM_CHARTS_REPOSITORY)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Outcome of one check in a plan report.
#[derive(Debug, Clone, Serialize)]
pub struct PlanCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

/// Ordered record of plan checks.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub checks: Vec<PlanCheck>,
    pub passed: bool,
}

impl PlanReport {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            passed: true,
        }
    }

    pub fn add_check(&mut self, name: &str, passed: bool, message: &str) {
        if !passed {
            self.passed = false;
        }
        self.checks.push(PlanCheck {
            name: name.to_string(),
            passed,
            message: message.to_string(),
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &PlanCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Turn a failed report into an error listing every failed check.
    pub fn into_result(self) -> IacResult<Self> {
        if self.passed {
            return Ok(self);
        }
        let summary = self
            .failures()
            .map(|c| c.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Err(IacError::AssertionsFailed(summary))
    }
}

impl Default for PlanReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Assertions over the planned values of a plan.
pub struct PlanAssertions<'a> {
    plan: &'a Plan,
}

impl<'a> PlanAssertions<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }

    /// Require that `key` is a planned resource.
    pub fn require_key_exists(&self, key: &str) -> Result<&'a PlannedResource, AssertionError> {
        self.plan
            .resource(key)
            .ok_or_else(|| AssertionError::MissingResource {
                key: key.to_string(),
                planned: self.plan.addresses().join(", "),
            })
    }

    /// Require that `key` exists and its `attribute` equals `expected`.
    pub fn expect_attribute(
        &self,
        key: &str,
        attribute: &str,
        expected: impl Into<Value>,
    ) -> Result<(), AssertionError> {
        let resource = self.require_key_exists(key)?;
        check_attribute(resource, attribute, &expected.into())
    }

    /// Check one expectation, recording each attribute check in `report`.
    ///
    /// A missing resource is recorded once and its attributes are skipped.
    pub fn verify_release(&self, expectation: &ReleaseExpectation, report: &mut PlanReport) {
        let resource = match self.require_key_exists(&expectation.key) {
            Ok(resource) => {
                report.add_check(&expectation.key, true, "present in plan");
                resource
            }
            Err(err) => {
                warn!("{}", err);
                report.add_check(&expectation.key, false, &err.to_string());
                return;
            }
        };

        for (attribute, expected) in &expectation.attributes {
            let name = format!("{}.{}", expectation.key, attribute);
            match check_attribute(resource, attribute, expected) {
                Ok(()) => {
                    debug!("{} = {}", name, expected);
                    report.add_check(&name, true, &format!("{} = {}", attribute, expected));
                }
                Err(err) => {
                    warn!("{}", err);
                    report.add_check(&name, false, &err.to_string());
                }
            }
        }
    }

    /// Check every expectation and return the full report.
    pub fn verify_releases(&self, expectations: &[ReleaseExpectation]) -> PlanReport {
        let mut report = PlanReport::new();
        for expectation in expectations {
            self.verify_release(expectation, &mut report);
        }
        report
    }
}

fn check_attribute(
    resource: &PlannedResource,
    attribute: &str,
    expected: &Value,
) -> Result<(), AssertionError> {
    let actual = resource.attribute(attribute);
    if actual == Some(expected) {
        return Ok(());
    }
    Err(AssertionError::AttributeMismatch {
        key: resource.address.clone(),
        attribute: attribute.to_string(),
        expected: expected.clone(),
        actual: describe(actual),
    })
}
