//! Output utilities for CLI commands
//!
//! Terminal helpers: a spinner for pod-wide steps whose output is captured,
//! and step headers for local steps that print straight to the terminal.

pub mod spinner;

pub use spinner::CommandSpinner;

use console::style;

/// Print a step header unless `quiet`
pub fn step(message: &str, quiet: bool) {
    if !quiet {
        println!("{} {}", style("==>").cyan().bold(), style(message).bold());
    }
}

/// Print a completed-step line unless `quiet`
pub fn done(message: &str, quiet: bool) {
    if !quiet {
        println!("{} {message}", style("\u{2713}").green());
    }
}

/// Print a skipped-step line unless `quiet`
pub fn skipped(message: &str, quiet: bool) {
    if !quiet {
        println!("{} {}", style("-").dim(), style(message).dim());
    }
}
