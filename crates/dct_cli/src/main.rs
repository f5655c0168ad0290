//! dc-testkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Assertion failure
//! - 4: Template error
//! - 5: IaC error
//! - 6: Region selection error

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dct_e2e::{E2eError, E2eSettings};
use dct_iac::IacError;
use dct_templates::TemplateError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const ASSERTION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const IAC_ERROR: u8 = 5;
    pub const REGION_ERROR: u8 = 6;
}

const CRATE_TARGETS: &[&str] = &["dctest", "dct_runner", "dct_templates", "dct_iac", "dct_e2e"];

fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };
    let mut directives: Vec<String> = CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    EnvFilter::new(directives.join(","))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(log_filter(cli.verbose, cli.quiet))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let settings_path = cli.settings.as_deref();

    let result = match cli.command {
        Commands::EnvName(args) => {
            load_settings(settings_path).and_then(|s| commands::env_name::execute(args, &s))
        }
        Commands::PickRegion(args) => async {
            let settings = load_settings(settings_path)?;
            commands::pick_region::execute(args, &settings).await
        }
        .await,
        Commands::Render(args) => async {
            commands::render::execute(args, load_settings(settings_path)?).await
        }
        .await,
        Commands::PlanCheck(args) => commands::plan_check::execute(args).await,
        Commands::Lint(args) => commands::lint::execute(args),
        Commands::Install(args) => async {
            commands::install::execute(args, load_settings(settings_path)?).await
        }
        .await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// A settings file that could not be loaded.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load settings: {0}")]
struct SettingsLoadError(#[source] E2eError);

/// Load settings for the commands that use them.
fn load_settings(path: Option<&Path>) -> anyhow::Result<E2eSettings> {
    E2eSettings::load_or_default(path).map_err(|e| SettingsLoadError(e).into())
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<SettingsLoadError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
        if let Some(err) = cause.downcast_ref::<E2eError>() {
            return match err {
                E2eError::NoCandidateRegions
                | E2eError::RegionExhausted { .. }
                | E2eError::VpcQuery { .. } => ExitCodes::REGION_ERROR,
                E2eError::UnexpectedStatus { .. } => ExitCodes::ASSERTION_FAILURE,
                E2eError::Settings(_) => ExitCodes::INVALID_ARGS,
                E2eError::Template(_) => ExitCodes::TEMPLATE_ERROR,
                E2eError::Iac(inner) => categorize_iac(inner),
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<IacError>() {
            return categorize_iac(err);
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn categorize_iac(err: &IacError) -> u8 {
    match err {
        IacError::Assertion(_) | IacError::AssertionsFailed(_) => ExitCodes::ASSERTION_FAILURE,
        IacError::UnknownProduct(_) => ExitCodes::INVALID_ARGS,
        _ => ExitCodes::IAC_ERROR,
    }
}
