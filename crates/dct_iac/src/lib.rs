//! # dct_iac
//!
//! Terraform driving and plan assertions for dc-testkit.
//!
//! This crate runs `terraform init`, `plan` and `show -json` against a
//! product module with a fixed variable map, parses the JSON plan into a
//! resource map keyed by address, and checks expected helm releases against
//! it.
//!
//! ## Features
//!
//! - Terraform commands over any [`dct_runner::CommandRunner`]
//! - Plan JSON model with nested module flattening
//! - Presence and attribute assertions with expected vs actual reporting
//! - Per-product fixture variables and release expectations
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dct_iac::{Product, ProductSuite, TerraformRunner};
//! use dct_runner::ProcessRunner;
//! use std::path::Path;
//!
//! # async fn run() -> dct_iac::IacResult<()> {
//! let terraform = TerraformRunner::new(Arc::new(ProcessRunner::default()));
//! let suite = ProductSuite::for_product(Product::Bamboo);
//!
//! let report = suite.run(&terraform, Path::new("modules")).await?;
//! assert!(report.passed);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod error;
pub mod fixtures;
pub mod plan;
pub mod product;
pub mod suite;
pub mod terraform;
pub mod variables;

pub use assertions::{AssertionError, PlanAssertions, PlanCheck, PlanReport, ReleaseExpectation};
pub use error::{IacError, IacResult};
pub use plan::{Plan, PlannedResource, ResourceChange};
pub use product::{Product, ProductList};
pub use suite::{ProductSuite, HELM_CHARTS_REPOSITORY};
pub use terraform::{TerraformOptions, TerraformResult, TerraformRunner};
pub use variables::{VarFile, VariableMap};
