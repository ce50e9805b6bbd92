use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::mageck::MageckStep;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Scripted stand-in for MAGeCK that records every command it receives.
///
/// Responses are registered per program, optionally narrowed to one
/// [`MageckStep`]. The first matching response wins.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    responses: Arc<Mutex<Vec<ScriptedResponse>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct ScriptedResponse {
    program: String,
    step: Option<MageckStep>,
    reply: Reply,
}

enum Reply {
    Exit { status: ExitStatus, stderr: String },
    NotFound,
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    response: ScriptedResponse,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scripting the reply for `program`; succeeds unless told otherwise
    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            response: ScriptedResponse {
                program: program.to_string(),
                step: None,
                reply: Reply::Exit {
                    status: ExitStatus::Success,
                    stderr: String::new(),
                },
            },
        }
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.call_history.lock().unwrap().clone()
    }

    /// The subcommand (first argument) of every recorded call, in order
    pub fn steps_called(&self) -> Vec<String> {
        self.get_call_history()
            .into_iter()
            .filter_map(|cmd| cmd.args.into_iter().next())
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.call_history.lock().unwrap().push(command.clone());

        let responses = self.responses.lock().unwrap();
        let subcommand = command.args.first().map(String::as_str);

        let matched = responses.iter().find(|r| {
            r.program == command.program
                && r.step.map_or(true, |step| Some(step.as_str()) == subcommand)
        });

        match matched.map(|r| &r.reply) {
            Some(Reply::Exit { status, stderr }) => Ok(ProcessOutput {
                status: status.clone(),
                stdout: String::new(),
                stderr: stderr.clone(),
                duration: Duration::from_millis(10),
            }),
            Some(Reply::NotFound) => Err(ProcessError::CommandNotFound(command.program.clone())),
            None => Err(ProcessError::MockExpectationNotMet(format!(
                "No scripted reply for: {}",
                command.display()
            ))),
        }
    }
}

impl MockCommandConfig {
    /// Only answer calls whose subcommand is `step`
    pub fn for_step(mut self, step: MageckStep) -> Self {
        self.response.step = Some(step);
        self
    }

    pub fn returns_stderr(mut self, captured: &str) -> Self {
        if let Reply::Exit { stderr, .. } = &mut self.response.reply {
            *stderr = captured.to_string();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        let status = if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        };
        match &mut self.response.reply {
            Reply::Exit { status: s, .. } => *s = status,
            reply => {
                *reply = Reply::Exit {
                    status,
                    stderr: String::new(),
                }
            }
        }
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Behave as if the program is not installed
    pub fn not_installed(mut self) -> Self {
        self.response.reply = Reply::NotFound;
        self
    }

    pub fn finish(self) {
        self.runner
            .responses
            .lock()
            .unwrap()
            .push(self.response);
    }
}
