//! Error types for end-to-end helpers.

use thiserror::Error;

/// Result type alias for e2e operations.
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while preparing or running an e2e environment.
#[derive(Error, Debug)]
pub enum E2eError {
    #[error("No candidate regions configured")]
    NoCandidateRegions,

    #[error("No region below the VPC limit after {attempts} attempts")]
    RegionExhausted { attempts: u32 },

    #[error("VPC query failed in {region}: {message}")]
    VpcQuery { region: String, message: String },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Template error: {0}")]
    Template(#[from] dct_templates::TemplateError),

    #[error("IaC error: {0}")]
    Iac(#[from] dct_iac::IacError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
