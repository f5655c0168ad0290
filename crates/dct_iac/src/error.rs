//! Error types for IaC module.

use thiserror::Error;

use crate::assertions::AssertionError;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur during IaC operations.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Terraform not available: {0}")]
    TerraformNotAvailable(String),

    #[error("Terraform init failed: {0}")]
    InitFailed(String),

    #[error("Terraform plan failed: {0}")]
    PlanFailed(String),

    #[error("Terraform show failed: {0}")]
    ShowFailed(String),

    #[error("Terraform apply failed: {0}")]
    ApplyFailed(String),

    #[error("Terraform destroy failed: {0}")]
    DestroyFailed(String),

    #[error("Terraform output failed: {0}")]
    OutputFailed(String),

    #[error("Terraform {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Invalid plan JSON: {0}")]
    InvalidPlan(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error(transparent)]
    Assertion(#[from] AssertionError),

    #[error("Plan assertions failed: {0}")]
    AssertionsFailed(String),

    #[error("Runner error: {0}")]
    Runner(#[from] dct_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
