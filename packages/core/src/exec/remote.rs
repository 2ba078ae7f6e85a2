//! Pod-wide command fan-out over SSH
//!
//! Every host gets its own `ssh` session; sessions for one command run
//! concurrently and the call returns once all of them have finished.
//! Host keys and the tpux identity come from the `~/.ssh/config` block
//! written during pod setup.

use std::ffi::OsString;
use std::net::Ipv4Addr;
use std::process::Stdio;

use futures_util::future::join_all;
use tokio::process::Command;

use super::env::CommandEnv;
use super::error::ExecError;

/// Runs the same command on every host of a pod
#[derive(Debug, Clone)]
pub struct PodExecutor {
    hosts: Vec<Ipv4Addr>,
    env: CommandEnv,
    ssh_program: OsString,
    ssh_args: Vec<OsString>,
}

impl PodExecutor {
    /// Create an executor for `hosts`, which must not be empty
    pub fn new(hosts: Vec<Ipv4Addr>, env: CommandEnv) -> Result<Self, ExecError> {
        if hosts.is_empty() {
            return Err(ExecError::EmptyHostSet);
        }

        Ok(Self {
            hosts,
            env,
            ssh_program: OsString::from("ssh"),
            ssh_args: Vec::new(),
        })
    }

    /// Use a different ssh client, e.g. a wrapper script
    ///
    /// `args` are passed before the standard options and the host.
    pub fn with_ssh_command<I, S>(mut self, program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.ssh_program = program.into();
        self.ssh_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn hosts(&self) -> &[Ipv4Addr] {
        &self.hosts
    }

    /// Run `command` on every host and wait for all of them
    ///
    /// Every failing host is logged; the first failure in host order is
    /// returned.
    pub async fn run(&self, command: &str) -> Result<(), ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        tracing::info!("Running on {} hosts: {command}", self.hosts.len());

        let remote_command = format!("{}{command}", self.env.export_prefix());
        let sessions = self
            .hosts
            .iter()
            .map(|host| self.run_on_host(*host, &remote_command, command));
        let results = join_all(sessions).await;

        let mut first_failure = None;
        for result in results {
            if let Err(e) = result {
                tracing::debug!("{e}");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run `commands` in order across the pod
    ///
    /// Each command finishes on every host before the next starts; the
    /// first failing command stops the list.
    pub async fn run_all<S: AsRef<str>>(&self, commands: &[S]) -> Result<(), ExecError> {
        for command in commands {
            self.run(command.as_ref()).await?;
        }
        Ok(())
    }

    async fn run_on_host(
        &self,
        host: Ipv4Addr,
        remote_command: &str,
        command: &str,
    ) -> Result<(), ExecError> {
        let mut cmd = self.build_ssh_command(host);
        cmd.arg(remote_command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                "SSH not found. Install OpenSSH client.".to_string()
            } else {
                e.to_string()
            };
            ExecError::Spawn {
                command: command.to_string(),
                reason,
            }
        })?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::debug!("[{host}] ok, {} lines of output", stdout.lines().count());
            for line in stdout.lines() {
                tracing::trace!("[{host}] {line}");
            }
            return Ok(());
        }

        Err(ExecError::CommandFailed {
            command: command.to_string(),
            host: Some(host.to_string()),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn build_ssh_command(&self, host: Ipv4Addr) -> Command {
        let mut cmd = Command::new(&self.ssh_program);
        cmd.args(&self.ssh_args);

        // Never prompt; a missing key must fail instead of hanging
        cmd.arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg("ConnectTimeout=30");

        cmd.arg(host.to_string());
        cmd
    }
}
