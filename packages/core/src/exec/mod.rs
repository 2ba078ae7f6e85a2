//! Command execution
//!
//! Two ways to run shell commands:
//! - [`LocalExecutor`]: sequentially on this machine
//! - [`PodExecutor`]: fanned out over SSH to every host of the pod
//!
//! Both take an explicit [`CommandEnv`] and stop at the first failing
//! command of a list.

mod env;
mod error;
mod local;
mod remote;

pub use env::CommandEnv;
pub use error::ExecError;
pub use local::{LocalExecutor, privileged_copy};
pub use remote::PodExecutor;
