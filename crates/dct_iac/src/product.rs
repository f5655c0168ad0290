//! Atlassian Data Center products under test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IacError;

/// A Data Center product the deployment modules can install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Jira,
    Confluence,
    Bitbucket,
    Bamboo,
}

impl Product {
    pub const ALL: [Product; 4] = [
        Product::Jira,
        Product::Confluence,
        Product::Bitbucket,
        Product::Bamboo,
    ];

    /// Lowercase identifier used in variable names and hostnames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jira => "jira",
            Self::Confluence => "confluence",
            Self::Bitbucket => "bitbucket",
            Self::Bamboo => "bamboo",
        }
    }

    /// Products whose license is passed through the rendered config.
    pub fn is_licensable(&self) -> bool {
        matches!(self, Self::Confluence | Self::Bitbucket | Self::Bamboo)
    }

    /// Products whose admin password is passed through the rendered config.
    pub fn has_admin_password(&self) -> bool {
        matches!(self, Self::Bitbucket | Self::Bamboo)
    }

    pub fn license_env_var(&self) -> String {
        format!("TF_VAR_{}_license", self.as_str())
    }

    pub fn admin_password_env_var(&self) -> String {
        format!("TF_VAR_{}_admin_password", self.as_str())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Product {
    type Err = IacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jira" => Ok(Self::Jira),
            "confluence" => Ok(Self::Confluence),
            "bitbucket" => Ok(Self::Bitbucket),
            "bamboo" => Ok(Self::Bamboo),
            other => Err(IacError::UnknownProduct(other.to_string())),
        }
    }
}

/// Ordered list of products requested for a test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductList(Vec<Product>);

impl ProductList {
    pub fn new(products: Vec<Product>) -> Self {
        Self(products)
    }

    /// Parse a comma separated list such as `jira,bamboo`.
    pub fn parse_csv(s: &str) -> Result<Self, IacError> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Product::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, product: Product) -> bool {
        self.0.contains(&product)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render as `"jira","bamboo"` for a tfvars list literal.
    pub fn quoted(&self) -> String {
        self.0
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<Product> for ProductList {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Product>> for ProductList {
    fn from(products: Vec<Product>) -> Self {
        Self(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products() {
        assert_eq!("Bamboo".parse::<Product>().unwrap(), Product::Bamboo);
        assert_eq!(" jira ".parse::<Product>().unwrap(), Product::Jira);
        assert!(matches!(
            "crowd".parse::<Product>(),
            Err(IacError::UnknownProduct(ref p)) if p == "crowd"
        ));
    }

    #[test]
    fn test_product_capabilities() {
        assert!(!Product::Jira.is_licensable());
        assert!(Product::Confluence.is_licensable());
        assert!(!Product::Confluence.has_admin_password());
        assert!(Product::Bamboo.has_admin_password());
        assert_eq!(Product::Bitbucket.license_env_var(), "TF_VAR_bitbucket_license");
        assert_eq!(
            Product::Bamboo.admin_password_env_var(),
            "TF_VAR_bamboo_admin_password"
        );
    }

    #[test]
    fn test_quoted_list() {
        let list = ProductList::parse_csv("jira, confluence").unwrap();
        assert_eq!(list.quoted(), "\"jira\",\"confluence\"");
        assert_eq!(ProductList::default().quoted(), "");
        assert_eq!(ProductList::new(vec![Product::Bamboo]).quoted(), "\"bamboo\"");
    }

    #[test]
    fn test_parse_csv_keeps_order() {
        let list = ProductList::parse_csv("bamboo,jira,").unwrap();
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            vec![Product::Bamboo, Product::Jira]
        );
        assert!(ProductList::parse_csv("jira,nope").is_err());
    }
}
