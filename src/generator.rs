use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::Config;
use crate::errors::AppError;

/// Captured output of a finished generator run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorOutput {
    pub success: bool,
    pub message: String,
    pub output: String,
    pub stderr: Option<String>,
}

/// Launches the out-of-process record generator.
///
/// The generator is expected to post its records to the ingest endpoint on
/// its own; only its console output comes back here.
#[derive(Debug, Clone)]
pub struct PipelineGenerator {
    program: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl PipelineGenerator {
    /// Splits `command` on whitespace into program and arguments.
    pub fn new(command: &str, workdir: Option<PathBuf>, timeout: Duration) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;

        Some(Self {
            program,
            args: parts.collect(),
            workdir,
            timeout,
        })
    }

    /// Generator described by `GENERATOR_COMMAND`, if one is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let command = config.generator_command.as_deref()?;
        Self::new(
            command,
            config.generator_dir.as_ref().map(PathBuf::from),
            Duration::from_secs(config.generator_timeout_secs),
        )
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the generator to completion. The child is killed if it outlives
    /// the configured timeout.
    pub async fn run(&self) -> Result<GeneratorOutput, AppError> {
        tracing::info!("Triggering generator: {}", self.command_line());

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.workdir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|e| {
            AppError::GeneratorError(format!("Failed to start '{}': {}", self.program, e))
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::GeneratorError(format!(
                    "Generator timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| AppError::GeneratorError(format!("Generator I/O failed: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!("Generator stderr: {}", stderr);
            return Err(AppError::GeneratorError(format!(
                "Generator exited with {}",
                output.status
            )));
        }

        tracing::info!("Generator output: {}", stdout.trim_end());
        if !stderr.trim().is_empty() {
            tracing::warn!("Generator stderr: {}", stderr.trim_end());
        }

        Ok(GeneratorOutput {
            success: true,
            message: "Pipeline executed successfully".to_string(),
            output: stdout,
            stderr: Some(stderr).filter(|s| !s.trim().is_empty()),
        })
    }
}
