//! Command execution error types

use thiserror::Error;

/// Errors that can occur while running commands locally or across the pod
#[derive(Error, Debug)]
pub enum ExecError {
    /// The command string was empty or whitespace
    #[error("Refusing to run an empty command")]
    EmptyCommand,

    /// A pod executor was built without any hosts
    #[error("No hosts to run on. Configure the pod addresses first.")]
    EmptyHostSet,

    /// Failed to start the process (shell, ssh or sudo)
    #[error("Failed to run `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The command ran and exited unsuccessfully
    #[error("Command failed on {}: {command}{}", .host.as_deref().unwrap_or("localhost"), exit_suffix(.status))]
    CommandFailed {
        command: String,
        /// Remote host the command ran on, `None` for local execution
        host: Option<String>,
        /// Exit code, `None` when killed by a signal
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit status {code})"),
        None => " (terminated by signal)".to_string(),
    }
}

impl ExecError {
    /// Captured standard error of a failed command, if any was produced
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ExecError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }
}
