//! Test configuration rendering.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use dct_iac::{Product, ProductList};
use dct_templates::TemplateRenderer;

use crate::error::E2eResult;
use crate::naming::environment_name;
use crate::region::RegionSelector;
use crate::resolve::{EnvLookup, LayeredValue, ProcessEnv};
use crate::settings::E2eSettings;

/// Template shipped with the crate, matching the install module's inputs.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/test-config.tfvars.tmpl");

/// Write the bundled template to `path` unless a file already exists there.
pub fn write_default_template(path: &Path) -> E2eResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_TEMPLATE)?;
    Ok(true)
}

/// Settings of one rendered test environment.
#[derive(Clone, PartialEq, Eq)]
pub struct TestConfig {
    pub aws_region: String,
    pub environment_name: String,
    /// Absolute path of the rendered tfvars file
    pub config_path: PathBuf,
    pub resource_owner: String,
    pub products: ProductList,
    pub confluence_license: String,
    pub bitbucket_license: String,
    pub bamboo_license: String,
    pub bamboo_password: String,
    pub bitbucket_password: String,
}

impl TestConfig {
    pub fn license(&self, product: Product) -> &str {
        match product {
            Product::Confluence => &self.confluence_license,
            Product::Bitbucket => &self.bitbucket_license,
            Product::Bamboo => &self.bamboo_license,
            Product::Jira => "",
        }
    }

    pub fn admin_password(&self, product: Product) -> &str {
        match product {
            Product::Bamboo => &self.bamboo_password,
            Product::Bitbucket => &self.bitbucket_password,
            Product::Jira | Product::Confluence => "",
        }
    }
}

// Licenses and passwords stay out of logs.
impl fmt::Debug for TestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("TestConfig")
            .field("aws_region", &self.aws_region)
            .field("environment_name", &self.environment_name)
            .field("config_path", &self.config_path)
            .field("resource_owner", &self.resource_owner)
            .field("products", &self.products)
            .field("confluence_license", &redact(&self.confluence_license))
            .field("bitbucket_license", &redact(&self.bitbucket_license))
            .field("bamboo_license", &redact(&self.bamboo_license))
            .field("bamboo_password", &redact(&self.bamboo_password))
            .field("bitbucket_password", &redact(&self.bitbucket_password))
            .finish()
    }
}

/// Builds a [`TestConfig`] and renders its tfvars file.
pub struct ConfigRenderer {
    settings: E2eSettings,
    env: Arc<dyn EnvLookup>,
    renderer: TemplateRenderer,
}

impl ConfigRenderer {
    pub fn new(settings: E2eSettings) -> Self {
        Self {
            settings,
            env: Arc::new(ProcessEnv),
            renderer: TemplateRenderer::new(),
        }
    }

    /// Read environment variables from `env` instead of the process.
    pub fn with_env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }

    pub fn settings(&self) -> &E2eSettings {
        &self.settings
    }

    /// License for `product`: compiled-in, then `TF_VAR_<product>_license`.
    ///
    /// Empty unless the product is requested and licensable.
    pub fn license(&self, products: &ProductList, product: Product) -> String {
        if !products.contains(product) || !product.is_licensable() {
            return String::new();
        }
        LayeredValue::new()
            .explicit(self.settings.compiled_license(product))
            .environment(product.license_env_var())
            .resolve_or_empty(self.env.as_ref())
    }

    /// Admin password for `product`, only ever from
    /// `TF_VAR_<product>_admin_password`.
    pub fn admin_password(&self, products: &ProductList, product: Product) -> String {
        if !products.contains(product) || !product.has_admin_password() {
            return String::new();
        }
        LayeredValue::new()
            .environment(product.admin_password_env_var())
            .resolve_or_empty(self.env.as_ref())
    }

    /// Select a region and render the config.
    pub async fn create_config(
        &self,
        selector: &RegionSelector,
        products: &ProductList,
    ) -> E2eResult<TestConfig> {
        let region = selector.select().await?;
        self.render(region, products)
    }

    /// Render the config for an already chosen region.
    pub fn render(&self, region: String, products: &ProductList) -> E2eResult<TestConfig> {
        let mut config = TestConfig {
            aws_region: region,
            environment_name: environment_name(&self.settings.environment_prefix),
            config_path: PathBuf::new(),
            resource_owner: self.settings.resource_owner.clone(),
            products: products.clone(),
            confluence_license: self.license(products, Product::Confluence),
            bitbucket_license: self.license(products, Product::Bitbucket),
            bamboo_license: self.license(products, Product::Bamboo),
            bamboo_password: self.admin_password(products, Product::Bamboo),
            bitbucket_password: self.admin_password(products, Product::Bitbucket),
        };

        let vars = self.template_variables(&config);
        config.config_path = self.renderer.render_file(
            &self.settings.template_path,
            &self.settings.output_path,
            &vars,
        )?;

        info!(
            "Rendered config for {} in {} at {:?}",
            config.environment_name, config.aws_region, config.config_path
        );
        Ok(config)
    }

    /// Placeholder values for the tfvars template.
    pub fn template_variables(&self, config: &TestConfig) -> HashMap<String, String> {
        [
            ("resource_owner", config.resource_owner.clone()),
            ("environment_name", config.environment_name.clone()),
            ("region", config.aws_region.clone()),
            ("products", config.products.quoted()),
            ("domain", self.settings.domain.clone()),
            ("confluence_license", config.confluence_license.clone()),
            ("bitbucket_license", config.bitbucket_license.clone()),
            ("bamboo_license", config.bamboo_license.clone()),
            ("bamboo_password", config.bamboo_password.clone()),
            ("bitbucket_password", config.bitbucket_password.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
