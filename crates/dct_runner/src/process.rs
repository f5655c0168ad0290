//! Process-based command runner.
//!
//! Spawns real subprocesses through tokio, captures their output line by
//! line and enforces the run timeout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::{CommandConfig, RunConfig};
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandRunner, ExecutionResult};

/// Process runner options.
#[derive(Debug, Clone)]
pub struct ProcessRunnerOptions {
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
    /// CI mode (prefix streamed lines with timestamps)
    pub ci_mode: bool,
}

impl Default for ProcessRunnerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            ci_mode: std::env::var("CI").is_ok(),
        }
    }
}

impl ProcessRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn ci_mode(mut self) -> Self {
        self.ci_mode = true;
        self
    }
}

/// Runner that executes commands as local subprocesses.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    options: ProcessRunnerOptions,
}

impl ProcessRunner {
    pub fn new(options: ProcessRunnerOptions) -> Self {
        Self { options }
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    fn spawn_error(program: &str, err: std::io::Error) -> RunnerError {
        if err.kind() == std::io::ErrorKind::NotFound {
            RunnerError::ProgramNotAvailable(program.to_string())
        } else {
            RunnerError::ExecutionFailed(format!("Failed to spawn {}: {}", program, err))
        }
    }
}

/// Drain a child pipe into a string, optionally echoing each line.
///
/// Lines are decoded lossily so the pipe is read to EOF whatever the child
/// writes.
async fn collect_lines<R>(
    reader: R,
    stream: &'static str,
    stream_logs: bool,
    ci_mode: bool,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut output = String::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Stopped reading {}: {}", stream, e);
                break;
            }
        }

        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        if stream_logs {
            if ci_mode {
                info!(
                    "[{}] [{}] {}",
                    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                    stream,
                    line
                );
            } else {
                info!("{}", line);
            }
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn is_available(&self, program: &str) -> RunnerResult<bool> {
        let status = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        Ok(status.map(|s| s.success()).unwrap_or(false))
    }

    async fn run(
        &self,
        command: &CommandConfig,
        run_config: &RunConfig,
    ) -> RunnerResult<ExecutionResult> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();

        if self.options.dry_run {
            info!("[DRY-RUN] Would run: {}", command.display());
            return Ok(ExecutionResult {
                run_id,
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                started_at,
                finished_at: started_at,
                duration_ms: 0,
            });
        }

        debug!("Executing: {}", command.display());

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(&command.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.workdir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(&command.program, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stderr was not captured".to_string()))?;

        let stream_logs = run_config.stream_logs;
        let ci_mode = self.options.ci_mode;
        let stdout_task = tokio::spawn(collect_lines(stdout, "stdout", stream_logs, ci_mode));
        let stderr_task = tokio::spawn(collect_lines(stderr, "stderr", stream_logs, ci_mode));

        let status = if run_config.timeout_seconds > 0 {
            let timeout = Duration::from_secs(run_config.timeout_seconds);
            match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!(
                        "{} exceeded {}s, killing it",
                        command.display(),
                        run_config.timeout_seconds
                    );
                    let _ = child.kill().await;
                    return Err(RunnerError::Timeout(run_config.timeout_seconds));
                }
            }
        } else {
            child.wait().await?
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        let exit_code = status.code().unwrap_or(-1) as i64;

        debug!("{} exited with {}", command.program, exit_code);

        Ok(ExecutionResult {
            run_id,
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
