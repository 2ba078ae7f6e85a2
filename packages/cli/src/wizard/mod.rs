//! Interactive prompts
//!
//! Every question can be answered up front with a flag; prompts only appear
//! for the ones that were not.

mod keys;
mod pod;
mod prechecks;
mod summary;

pub use keys::wait_for_key_propagation;
pub use pod::prompt_pod_addresses;
pub use prechecks::verify_tty;
pub use summary::display_pod_summary;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use console::Term;
use dialoguer::Confirm;

/// Answer to a yes/no flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNo {
    #[value(name = "y")]
    Yes,
    #[value(name = "n")]
    No,
}

impl From<YesNo> for bool {
    fn from(answer: YesNo) -> Self {
        answer == YesNo::Yes
    }
}

/// Handle Ctrl+C during a prompt by restoring cursor and returning error
fn handle_interrupt() -> anyhow::Error {
    // Restore cursor in case it was hidden
    let _ = Term::stdout().show_cursor();
    anyhow!("Setup cancelled")
}

/// Ask a yes/no question unless `flag` already answers it
///
/// `default` picks the hint: `[Y/n]`, `[y/N]` or `[y/n]` when an answer is
/// required.
pub fn prompt_yes_no(prompt: &str, flag: Option<YesNo>, default: Option<bool>) -> Result<bool> {
    if let Some(answer) = flag {
        tracing::debug!("'{prompt}' answered by flag: {answer:?}");
        return Ok(answer.into());
    }

    let mut confirm = Confirm::new().with_prompt(prompt);
    if let Some(default) = default {
        confirm = confirm.default(default);
    }

    confirm.interact().map_err(|_| handle_interrupt())
}
