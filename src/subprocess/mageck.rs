use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ProcessCommand, ProcessRunner};

/// The two MAGeCK subcommands driven by koscreen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MageckStep {
    Count,
    Test,
}

impl MageckStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            MageckStep::Count => "count",
            MageckStep::Test => "test",
        }
    }
}

impl fmt::Display for MageckStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one MAGeCK invocation that actually ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded {
        duration: Duration,
    },
    Failed {
        exit_code: Option<i32>,
        /// Empty when the step wrote straight to the terminal
        stderr: String,
    },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded { .. })
    }
}

pub struct MageckRunnerImpl {
    runner: Arc<dyn ProcessRunner>,
}

impl MageckRunnerImpl {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Run one step to completion.
    ///
    /// A non-zero exit is reported as [`StepOutcome::Failed`]; only failures to
    /// launch or wait on the process surface as `Err`.
    pub async fn run_step(
        &self,
        step: MageckStep,
        command: ProcessCommand,
    ) -> Result<StepOutcome, ProcessError> {
        tracing::info!("mageck {}: {}", step, command.display());

        let output = self.runner.run(command).await?;

        if output.status.success() {
            Ok(StepOutcome::Succeeded {
                duration: output.duration,
            })
        } else {
            tracing::warn!(
                "mageck {} exited with {:?} after {:?}",
                step,
                output.status,
                output.duration
            );
            Ok(StepOutcome::Failed {
                exit_code: output.status.code(),
                stderr: output.stderr,
            })
        }
    }
}
