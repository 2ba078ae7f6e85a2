//! Teardown flows (`--clear`)
//!
//! Undo what setup wrote. Steps are independent: a failing step is reported
//! and the rest still run.

use anyhow::{Result, anyhow, bail};
use console::style;
use tpux_core::host::{
    clear_ssh_config, get_private_key_path, get_ssh_config_path, public_key_path,
    remove_key_pair,
};
use tpux_core::shell::{ShellError, clear_path_block, find_user_shell_rc};
use tpux_core::{config, nfs, remove_pod_hosts};

use crate::output;

/// Result of one teardown step
enum Outcome {
    Done(String),
    Skipped(String),
}

fn changed(did_change: bool, done: impl Into<String>, skipped: impl Into<String>) -> Outcome {
    if did_change {
        Outcome::Done(done.into())
    } else {
        Outcome::Skipped(skipped.into())
    }
}

/// Run one step, reporting instead of propagating its failure
///
/// Returns whether the step succeeded.
fn teardown_step(name: &str, quiet: bool, action: impl FnOnce() -> Result<Outcome>) -> bool {
    match action() {
        Ok(Outcome::Done(message)) => {
            output::done(&message, quiet);
            true
        }
        Ok(Outcome::Skipped(message)) => {
            output::skipped(&message, quiet);
            true
        }
        Err(e) => {
            tracing::debug!("Teardown step '{name}' failed: {e:#}");
            eprintln!("{} {name}: {e:#}", style("Warning:").yellow().bold());
            false
        }
    }
}

fn clear_shell_path() -> Result<Outcome> {
    let rc_file = match find_user_shell_rc() {
        Ok(path) => path,
        Err(ShellError::NoRcFile(home)) => {
            return Ok(Outcome::Skipped(format!(
                "No .zshrc or .bashrc in {home}, PATH left alone"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(changed(
        clear_path_block(&rc_file)?,
        format!("Removed PATH block from {}", rc_file.display()),
        format!("No tpux block in {}", rc_file.display()),
    ))
}

fn clear_ssh_block() -> Result<Outcome> {
    let path = get_ssh_config_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(changed(
        clear_ssh_config(&path)?,
        format!("Removed tpux block from {}", path.display()),
        format!("No tpux block in {}", path.display()),
    ))
}

fn delete_keys() -> Result<Outcome> {
    let private_key =
        get_private_key_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    let existed = private_key.exists() || public_key_path(&private_key).exists();
    remove_key_pair(&private_key)?;
    Ok(changed(
        existed,
        format!("Deleted {} and its .pub", private_key.display()),
        "No tpux SSH key to delete",
    ))
}

fn clear_exports_block() -> Result<Outcome> {
    let exports = nfs::exports_file();
    Ok(changed(
        nfs::clear_exports(&exports)?,
        format!("Removed tpux block from {}", exports.path().display()),
        format!("No tpux block in {}", exports.path().display()),
    ))
}

fn delete_pod_hosts() -> Result<Outcome> {
    let path = config::get_pod_hosts_path()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(changed(
        remove_pod_hosts(&path)?,
        format!("Deleted {}", path.display()),
        "No pod addresses saved",
    ))
}

fn finish(failed: usize, quiet: bool) -> Result<()> {
    if failed > 0 {
        bail!("Teardown finished with {failed} failed step(s)");
    }
    if !quiet {
        println!();
        println!("{}", style("tpux configuration removed.").green().bold());
    }
    Ok(())
}

/// Remove the single-host configuration
pub fn cmd_teardown_single_host(quiet: bool) -> Result<()> {
    output::step("Removing tpux configuration", quiet);
    let ok = teardown_step("shell PATH block", quiet, clear_shell_path);
    finish(usize::from(!ok), quiet)
}

/// Remove the pod configuration from this host
pub fn cmd_teardown_pod(quiet: bool) -> Result<()> {
    output::step("Removing tpux pod configuration", quiet);

    let steps: [(&str, fn() -> Result<Outcome>); 5] = [
        ("SSH config block", clear_ssh_block),
        ("SSH key pair", delete_keys),
        ("NFS exports block", clear_exports_block),
        ("shell PATH block", clear_shell_path),
        ("pod address file", delete_pod_hosts),
    ];

    let failed = steps
        .into_iter()
        .filter(|(name, action)| !teardown_step(name, quiet, action))
        .count();

    finish(failed, quiet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_step_is_reported_not_propagated() {
        assert!(!teardown_step("broken", true, || Err(anyhow!("boom"))));
        assert!(teardown_step("noop", true, || {
            Ok(Outcome::Skipped("nothing".to_string()))
        }));
    }

    #[test]
    fn finish_fails_when_any_step_failed() {
        assert!(finish(0, true).is_ok());
        let err = finish(2, true).unwrap_err();
        assert!(err.to_string().contains("2 failed step(s)"));
    }

    #[test]
    fn changed_picks_message() {
        assert!(matches!(changed(true, "a", "b"), Outcome::Done(m) if m == "a"));
        assert!(matches!(changed(false, "a", "b"), Outcome::Skipped(m) if m == "b"));
    }
}
