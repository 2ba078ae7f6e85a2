//! SSH key propagation wait
//!
//! The pod key reaches the other hosts through project metadata, which the
//! operator edits in the Cloud Console. tpux can only wait and re-check.

use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::Input;
use tpux_core::host::is_key_authorized;

use super::{handle_interrupt, verify_tty};

const SSH_KEYS_URL: &str = "https://console.cloud.google.com/compute/metadata?resourceTab=sshkeys";

const FIRST_WAIT: &str = "Please press enter to continue...";

const PROPAGATION_PENDING: &str = "The key has not been propagated to host machines. \
    Please wait for a while, and then press enter to continue...";

/// Show `public_key` and wait until it appears in `authorized_keys`
///
/// Each Enter re-checks the file. There is no timeout; Ctrl+C cancels.
pub fn wait_for_key_propagation(public_key: &str, authorized_keys: &Path) -> Result<()> {
    println!("Generated public key for tpux:");
    println!("{public_key}");

    if is_key_authorized(public_key, authorized_keys)? {
        println!(
            "{}",
            style("Key already present in authorized_keys, skipping propagation wait.").dim()
        );
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "Please open {SSH_KEYS_URL} and add this public key. \
            This key will be automatically propagated to all hosts."
        ))
        .yellow()
    );

    verify_tty(&["(waiting for SSH key propagation)"])?;

    let mut prompt = FIRST_WAIT;
    loop {
        wait_for_enter(prompt)?;
        if is_key_authorized(public_key, authorized_keys)? {
            tracing::info!("Key found in {}", authorized_keys.display());
            return Ok(());
        }
        prompt = PROPAGATION_PENDING;
    }
}

fn wait_for_enter(prompt: &str) -> Result<()> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .report(false)
        .interact_text()
        .map_err(|_| handle_interrupt())?;
    Ok(())
}
