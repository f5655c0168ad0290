//! Per-product plan suites.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::assertions::{PlanAssertions, PlanReport, ReleaseExpectation};
use crate::error::IacResult;
use crate::fixtures;
use crate::plan::Plan;
use crate::product::Product;
use crate::terraform::{TerraformOptions, TerraformRunner};
use crate::variables::VariableMap;

/// Helm repository hosting the Data Center charts.
pub const HELM_CHARTS_REPOSITORY: &str = "https://atlassian.github.io/data-center-helm-charts";

/// A product module, the variables to plan it with and the releases the
/// plan must contain.
#[derive(Debug, Clone)]
pub struct ProductSuite {
    pub product: Product,
    /// Module path relative to the modules root
    pub module_path: PathBuf,
    pub variables: VariableMap,
    pub releases: Vec<ReleaseExpectation>,
}

impl ProductSuite {
    /// The default suite for `product`.
    pub fn for_product(product: Product) -> Self {
        let mut releases = vec![ReleaseExpectation::helm(
            format!("helm_release.{}", product),
            product.as_str(),
        )];
        if product == Product::Bamboo {
            releases.push(ReleaseExpectation::helm(
                "helm_release.bamboo_agent",
                "bamboo-agent",
            ));
        }

        Self {
            product,
            module_path: PathBuf::from("products").join(product.as_str()),
            variables: fixtures::correct_variables(product),
            releases,
        }
    }

    pub fn with_variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_releases(mut self, releases: Vec<ReleaseExpectation>) -> Self {
        self.releases = releases;
        self
    }

    pub fn module_dir(&self, modules_root: &Path) -> PathBuf {
        modules_root.join(&self.module_path)
    }

    /// Check this suite's expectations against an existing plan.
    pub fn verify(&self, plan: &Plan) -> PlanReport {
        PlanAssertions::new(plan).verify_releases(&self.releases)
    }

    /// Plan the module under `modules_root` and verify the releases.
    pub async fn run(
        &self,
        terraform: &TerraformRunner,
        modules_root: &Path,
    ) -> IacResult<PlanReport> {
        let options =
            TerraformOptions::new(self.module_dir(modules_root)).with_vars(self.variables.clone());

        info!("Planning {} module at {:?}", self.product, options.terraform_dir);
        let plan = terraform.init_and_plan_and_show(&options).await?;

        let report = self.verify(&plan);
        info!(
            "{} suite: {}/{} checks passed",
            self.product,
            report.checks.iter().filter(|c| c.passed).count(),
            report.checks.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bamboo_suite_expects_agent_release() {
        let suite = ProductSuite::for_product(Product::Bamboo);
        let keys: Vec<_> = suite.releases.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["helm_release.bamboo", "helm_release.bamboo_agent"]);
        assert_eq!(suite.releases[1].attributes["chart"], "bamboo-agent");
        assert_eq!(suite.module_path, PathBuf::from("products/bamboo"));
    }

    #[test]
    fn test_single_release_products() {
        for product in [Product::Jira, Product::Confluence, Product::Bitbucket] {
            let suite = ProductSuite::for_product(product);
            assert_eq!(suite.releases.len(), 1);
            assert_eq!(suite.releases[0].attributes["status"], "deployed");
            assert_eq!(
                suite.releases[0].attributes["repository"],
                HELM_CHARTS_REPOSITORY
            );
        }
    }
}
