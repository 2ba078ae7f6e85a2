//! Prompt prechecks
//!
//! Validates the environment before any interactive prompt.

use anyhow::{Result, bail};
use std::io::IsTerminal;

/// Verify a TTY is available when some answers must be prompted for
///
/// `unanswered` lists the flags that were not given on the command line.
pub fn verify_tty(unanswered: &[&str]) -> Result<()> {
    if unanswered.is_empty() || std::io::stdin().is_terminal() {
        return Ok(());
    }

    bail!("{}", no_tty_message(unanswered));
}

fn no_tty_message(unanswered: &[&str]) -> String {
    format!(
        "No TTY detected and these questions have no answer: {}\n\n\
        Pass every answer as a flag for non-interactive setup, e.g.:\n  \
        tpux -p y -z y -s y -i 10.130.0.3,10.130.0.4",
        unanswered.join(", ")
    )
}
