//! Install, verify and tear down a rendered environment.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use dct_iac::{Product, TerraformOptions, TerraformRunner};
use dct_runner::CommandRunner;

use crate::config::TestConfig;
use crate::error::E2eResult;
use crate::http::PageClient;
use crate::naming::test_banner;

/// Default URL of a product in an environment.
pub fn product_url(product: Product, environment_name: &str, domain: &str) -> String {
    format!("https://{}.{}.{}", product, environment_name, domain)
}

/// A product page that answered.
#[derive(Debug, Clone)]
pub struct ProductCheck {
    pub product: Product,
    pub url: String,
    pub bytes: usize,
}

/// Runs the install module against a rendered config.
pub struct Installer {
    terraform: TerraformRunner,
    http: PageClient,
    install_dir: PathBuf,
    domain: String,
    timeout_seconds: u64,
}

impl Installer {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        install_dir: impl Into<PathBuf>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            terraform: TerraformRunner::new(runner),
            http: PageClient::default(),
            install_dir: install_dir.into(),
            domain: domain.into(),
            timeout_seconds: 3600,
        }
    }

    pub fn with_http(mut self, http: PageClient) -> Self {
        self.http = http;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    fn options(&self, config: &TestConfig) -> TerraformOptions {
        TerraformOptions::new(&self.install_dir)
            .with_var_file(&config.config_path)
            .with_timeout(self.timeout_seconds)
    }

    /// Apply, verify every requested product, then destroy.
    ///
    /// Destroy always runs; the first error wins.
    pub async fn run(&self, config: &TestConfig) -> E2eResult<Vec<ProductCheck>> {
        let outcome = self.install_and_verify(config).await;
        let destroyed = self.uninstall(config).await;

        match (outcome, destroyed) {
            (Err(err), destroyed) => {
                if let Err(destroy_err) = destroyed {
                    warn!("Destroy after failed run also failed: {}", destroy_err);
                }
                Err(err)
            }
            (Ok(_), Err(err)) => Err(err),
            (Ok(checks), Ok(())) => Ok(checks),
        }
    }

    /// Init and apply the install module, then check each product URL.
    pub async fn install_and_verify(&self, config: &TestConfig) -> E2eResult<Vec<ProductCheck>> {
        info!("{}", test_banner("Installing", &config.environment_name));
        let options = self.options(config);

        self.terraform.init(&options).await?;
        self.terraform.apply(&options).await?;

        let outputs = self.terraform.output_json(&options).await?;

        info!("{}", test_banner("Verifying", &config.environment_name));
        let mut checks = Vec::new();
        for product in config.products.iter().copied() {
            let url = outputs
                .get("product_urls")
                .and_then(|urls| urls.get(product.as_str()))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| product_url(product, &config.environment_name, &self.domain));

            let content = self.http.get_page_content(&url).await?;
            checks.push(ProductCheck {
                product,
                url,
                bytes: content.len(),
            });
        }

        Ok(checks)
    }

    /// Destroy everything the install module created.
    pub async fn uninstall(&self, config: &TestConfig) -> E2eResult<()> {
        info!("{}", test_banner("Destroying", &config.environment_name));
        self.terraform.destroy(&self.options(config)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url() {
        assert_eq!(
            product_url(Product::Bamboo, "e2etest-abc123", "deplops.com"),
            "https://bamboo.e2etest-abc123.deplops.com"
        );
    }
}
