use std::path::Path;
use std::time::Duration;

use crate::subprocess::ProcessCommand;

/// Fluent construction of a [`ProcessCommand`]
pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                working_dir: None,
                timeout: None,
                inherit_output: false,
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    /// Append a path argument, converting lossily to UTF-8
    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(&arg)
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Kill the process if it runs longer than `timeout`; `None` waits indefinitely
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command.timeout = timeout;
        self
    }

    /// Let the child write straight to our stdout/stderr
    pub fn inherit_output(mut self) -> Self {
        self.command.inherit_output = true;
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
