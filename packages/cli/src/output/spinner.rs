//! Step spinner with elapsed time display
//!
//! Pod-wide steps capture every host's output, so the terminal would sit
//! silent for minutes without one.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_CHARS: &str =
    "\u{28CB}\u{2819}\u{2839}\u{2838}\u{283C}\u{2834}\u{2826}\u{2827}\u{2807}\u{280F}";

/// A spinner for a multi-command step
///
/// Shows `spinner label [i/n] command (HH:MM:SS)`. In quiet mode every
/// method is a no-op.
///
/// # Example
///
/// ```ignore
/// let spinner = CommandSpinner::new_maybe("Installing packages", quiet);
/// spinner.command(1, 4, "sudo apt-get install -y -qq zsh");
/// spinner.success("Installed packages");
/// ```
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
    label: String,
}

impl CommandSpinner {
    /// Create a spinner that ticks every 100ms
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed_precise:.dim})")
        {
            bar.set_style(style.tick_chars(TICK_CHARS));
        }
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar: Some(bar),
            label: label.to_string(),
        }
    }

    /// Create a spinner that respects quiet mode
    pub fn new_maybe(label: &str, quiet: bool) -> Self {
        if quiet {
            Self {
                bar: None,
                label: label.to_string(),
            }
        } else {
            Self::new(label)
        }
    }

    /// Show which command of the step is running
    pub fn command(&self, index: usize, total: usize, command: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format_progress(&self.label, index, total, command));
        }
    }

    /// Finish the spinner with a success message (green checkmark)
    pub fn success(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!(
                "{} {}",
                console::style("\u{2713}").green(),
                message
            ));
        }
    }

    /// Finish the spinner with a failure message (red X)
    pub fn fail(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!("{} {}", console::style("\u{2717}").red(), message));
        }
    }
}

fn format_progress(label: &str, index: usize, total: usize, command: &str) -> String {
    if total <= 1 {
        return format!("{label}: {command}");
    }
    format!("{label} [{index}/{total}]: {command}")
}
