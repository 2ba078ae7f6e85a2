//! tpux - set up Cloud TPU VMs and TPU Pods
//!
//! Binary entry point. All logic lives in the library so it can be tested.

use console::style;

fn main() {
    if let Err(err) = tpux::run() {
        if let Some(usage) = err.downcast_ref::<clap::Error>() {
            // Usage errors, help and version keep clap's own formatting
            let _ = usage.print();
        } else {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            if let Some(stderr) = tpux::command_stderr(&err) {
                eprintln!();
                for line in stderr.trim_end().lines() {
                    eprintln!("  {}", style(line).dim());
                }
            }
        }
        std::process::exit(tpux::exit_code(&err));
    }
}
