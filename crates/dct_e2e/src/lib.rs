//! # dct_e2e
//!
//! End-to-end environment helpers for dc-testkit.
//!
//! This crate prepares a throwaway Data Center deployment for a test run:
//! it picks an AWS region with spare VPC capacity, generates a unique
//! environment name, resolves licenses and admin passwords, renders the
//! install module's tfvars file, and drives install, verification and
//! teardown.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dct_e2e::{ConfigRenderer, E2eSettings, Ec2VpcCounter, RegionSelector};
//! use dct_iac::ProductList;
//!
//! # async fn run() -> dct_e2e::E2eResult<()> {
//! let settings = E2eSettings::default();
//! let counter = Arc::new(Ec2VpcCounter::from_env().await);
//! let selector = RegionSelector::from_settings(&settings, counter);
//!
//! let products = ProductList::parse_csv("jira,bamboo")?;
//! let config = ConfigRenderer::new(settings)
//!     .create_config(&selector, &products)
//!     .await?;
//! println!("{} in {}", config.environment_name, config.aws_region);
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod config;
pub mod error;
pub mod http;
pub mod installer;
pub mod metadata;
pub mod naming;
pub mod region;
pub mod resolve;
pub mod settings;

pub use aws::Ec2VpcCounter;
pub use config::{write_default_template, ConfigRenderer, TestConfig, DEFAULT_TEMPLATE};
pub use error::{E2eError, E2eResult};
pub use http::PageClient;
pub use installer::{product_url, Installer, ProductCheck};
pub use metadata::lint_variables;
pub use naming::{environment_name, test_banner, unique_id};
pub use region::{RandomRegionPicker, RegionPicker, RegionSelector, VpcCounter, VpcUsage};
pub use resolve::{EnvLookup, LayeredValue, ProcessEnv, ValueSource};
pub use settings::{E2eSettings, RetryPolicy};
