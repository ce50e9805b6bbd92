use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for koscreen
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Filesystem error: {message}")]
    Io {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        command: Option<String>,
        exit_code: Option<i32>,
        stderr: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ScreenError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message, None)
    }

    /// Create a configuration error with specific code and path
    pub fn config_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an input table error with default code
    pub fn input(message: impl Into<String>) -> Self {
        Self::input_with_code(ErrorCode::INPUT_GENERIC, message, None)
    }

    /// Create an input table error with specific code and path
    pub fn input_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a filesystem error with specific code and path
    pub fn io_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Io {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an execution error with default code
    pub fn execution(message: impl Into<String>) -> Self {
        Self::execution_with_code(ErrorCode::EXEC_GENERIC, message, None)
    }

    /// Create an execution error with specific code
    pub fn execution_with_code(
        code: u16,
        message: impl Into<String>,
        command: Option<String>,
    ) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            command,
            exit_code: None,
            stderr: None,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Input { source: src, .. }
            | Self::Io { source: src, .. }
            | Self::Execution { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Input { message, .. }
            | Self::Io { message, .. }
            | Self::Execution { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Set the exit code and captured stderr for an execution error
    pub fn with_process_output(mut self, exit_code: Option<i32>, captured: &str) -> Self {
        if let Self::Execution {
            exit_code: ref mut ec,
            stderr: ref mut err,
            ..
        } = self
        {
            *ec = exit_code;
            if !captured.trim().is_empty() {
                *err = Some(captured.to_string());
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Input { code, .. }
            | Self::Io { code, .. }
            | Self::Execution { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, path, .. } => match path {
                Some(p) => format!("Configuration problem in {}: {}", p.display(), message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Input { message, path, .. } => match path {
                Some(p) => format!("Problem with input {}: {}", p.display(), message),
                None => format!("Input problem: {}", message),
            },
            Self::Io { message, path, .. } => match path {
                Some(p) => format!("Filesystem error at {}: {}", p.display(), message),
                None => format!("Filesystem error: {}", message),
            },
            Self::Execution {
                message,
                command,
                exit_code,
                ..
            } => {
                let mut msg = match command {
                    Some(cmd) => format!("Command '{}' failed: {}", cmd, message),
                    None => format!("Execution error: {}", message),
                };
                if let Some(code) = exit_code {
                    msg.push_str(&format!(" (exit code {})", code));
                }
                msg
            }
        }
    }

    /// Exit code reported by the external process, if any
    pub fn process_exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Type alias for Results using ScreenError
pub type Result<T> = std::result::Result<T, ScreenError>;
