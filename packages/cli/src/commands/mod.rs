//! CLI command implementations
//!
//! Setup and teardown flows for a single TPU VM and for a TPU Pod.

mod setup;
mod teardown;

pub use setup::{SetupOptions, cmd_setup_pod, cmd_setup_single_host};
pub use teardown::{cmd_teardown_pod, cmd_teardown_single_host};
