//! # dct_runner
//!
//! Subprocess execution layer for dc-testkit.
//!
//! Every external CLI the test kit drives (terraform in particular) goes
//! through the [`CommandRunner`] trait, so tests can swap the real process
//! runner for a recording mock.
//!
//! # Features
//!
//! - **Process Runner**: tokio-based subprocess execution with timeouts
//! - **Dry-Run Mode**: Log commands without executing them
//! - **Mock Runner**: Canned responses and call capture for unit tests
//!
//! # Example
//!
//! ```rust,no_run
//! use dct_runner::{CommandConfig, CommandRunner, ProcessRunner, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = ProcessRunner::default();
//!
//!     let command = CommandConfig::new("terraform")
//!         .arg("version")
//!         .workdir("products/bamboo");
//!
//!     let result = runner.run(&command, &RunConfig::default()).await?;
//!     println!("Exit code: {}", result.exit_code);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mock;
pub mod process;
pub mod runner;

pub use config::{CommandConfig, RunConfig};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use process::{ProcessRunner, ProcessRunnerOptions};
pub use runner::{CommandRunner, ExecutionResult};
