//! Local command execution

use std::path::Path;
use std::process::{Command, Output, Stdio};

use super::env::CommandEnv;
use super::error::ExecError;

/// Runs shell commands on this machine, one at a time
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    env: CommandEnv,
}

impl LocalExecutor {
    pub fn new(env: CommandEnv) -> Self {
        Self { env }
    }

    /// Run `command` through `sh -c`
    ///
    /// Standard output goes straight to the terminal; standard error is
    /// captured and returned in the error when the command fails.
    pub fn run(&self, command: &str) -> Result<(), ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        tracing::info!("Running locally: {command}");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.envs(self.env.iter());
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| ExecError::Spawn {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

        check_output(command, output)
    }

    /// Run `commands` in order, stopping at the first failure
    pub fn run_all<S: AsRef<str>>(&self, commands: &[S]) -> Result<(), ExecError> {
        for command in commands {
            self.run(command.as_ref())?;
        }
        Ok(())
    }
}

/// Copy `src` over `dest` with `sudo cp`
///
/// Used for system files the current user cannot write directly.
pub fn privileged_copy(src: &Path, dest: &Path) -> Result<(), ExecError> {
    let command = format!("sudo cp {} {}", src.display(), dest.display());
    tracing::debug!("{command}");

    let output = Command::new("sudo")
        .arg("cp")
        .arg(src)
        .arg(dest)
        .stdin(Stdio::inherit())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                "sudo not found".to_string()
            } else {
                e.to_string()
            };
            ExecError::Spawn {
                command: command.clone(),
                reason,
            }
        })?;

    check_output(&command, output)
}

fn check_output(command: &str, output: Output) -> Result<(), ExecError> {
    if output.status.success() {
        return Ok(());
    }

    Err(ExecError::CommandFailed {
        command: command.to_string(),
        host: None,
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
